//! The fixed-size window every windowed indicator is computed with.

use std::collections::VecDeque;

/// A fixed-capacity FIFO window over `f64` values.
///
/// Pushing into a full window evicts the oldest value. Statistics are only reported
/// once the window is full, so a series shorter than the window never yields a value.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    /// `capacity` must be at least one; callers validate periods before building windows.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            values: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Appends a value, returning the one that fell out of the window, if any.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let evicted = if self.values.len() == self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Arithmetic mean of a full window.
    pub fn mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.capacity as f64)
    }

    /// Sample standard deviation (`n - 1`) of a full window.
    pub fn sample_std_dev(&self) -> Option<f64> {
        if !self.is_full() || self.capacity < 2 {
            return None;
        }
        let mean = self.mean()?;
        let sum_sq: f64 = self.values.iter().map(|v| (v - mean).powi(2)).sum();
        Some((sum_sq / (self.capacity - 1) as f64).sqrt())
    }
}

/// Slides a window of `period` over `values` and applies `stat` at every position.
///
/// A `None` input empties the window, so no output mixes values from both sides of a
/// gap. The output has the same length as the input.
pub fn rolling<F>(values: &[Option<f64>], period: usize, stat: F) -> Vec<Option<f64>>
where
    F: Fn(&RollingWindow) -> Option<f64>,
{
    let mut window = RollingWindow::new(period);
    values
        .iter()
        .map(|value| match value {
            Some(v) => {
                window.push(*v);
                stat(&window)
            }
            None => {
                window.clear();
                None
            }
        })
        .collect()
}

pub fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, RollingWindow::mean)
}

pub fn rolling_sample_std(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, RollingWindow::sample_std_dev)
}
