use chrono::NaiveDate;
use core_types::ReturnSeries;
use serde::{Deserialize, Serialize};

/// One row of the underwater curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub date: NaiveDate,
    /// Cumulative wealth of one unit invested at the base date.
    pub wealth: f64,
    /// Highest wealth reached so far.
    pub peak: f64,
    /// `(wealth - peak) / peak`, always `<= 0`.
    pub drawdown: f64,
}

/// The wealth/peak/drawdown curve of a return series and its deepest point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownProfile {
    /// Starts with the base date at wealth 1, then one row per return.
    pub points: Vec<DrawdownPoint>,
    /// The minimum drawdown, `0.0` for a series that never falls below its peak.
    pub max_drawdown: f64,
    pub peak_date: Option<NaiveDate>,
    pub trough_date: Option<NaiveDate>,
    /// Calendar days from `peak_date` to `trough_date`.
    pub duration_days: i64,
}

impl DrawdownProfile {
    /// Builds the profile in a single pass.
    ///
    /// The trough is the first occurrence of the minimum; the peak is the last date at
    /// or before it where the drawdown was zero.
    pub fn from_returns(returns: &ReturnSeries) -> Self {
        let base = returns.base_date();
        let mut points = Vec::with_capacity(returns.len() + 1);
        points.push(DrawdownPoint {
            date: base,
            wealth: 1.0,
            peak: 1.0,
            drawdown: 0.0,
        });

        let mut wealth = 1.0_f64;
        let mut peak = 1.0_f64;
        let mut last_high = base;
        let mut max_drawdown = 0.0_f64;
        let mut worst: Option<(NaiveDate, NaiveDate)> = None;

        for point in returns.points() {
            wealth *= 1.0 + point.value;
            let drawdown = if wealth >= peak {
                peak = wealth;
                last_high = point.date;
                0.0
            } else {
                (wealth - peak) / peak
            };

            if drawdown < max_drawdown {
                max_drawdown = drawdown;
                worst = Some((last_high, point.date));
            }

            points.push(DrawdownPoint {
                date: point.date,
                wealth,
                peak,
                drawdown,
            });
        }

        let duration_days = worst
            .map(|(peak, trough)| (trough - peak).num_days())
            .unwrap_or(0);

        Self {
            points,
            max_drawdown,
            peak_date: worst.map(|(peak, _)| peak),
            trough_date: worst.map(|(_, trough)| trough),
            duration_days,
        }
    }

    /// The drawdown column alone.
    pub fn drawdowns(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.drawdown).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core_types::ReturnPoint;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn returns(values: &[f64]) -> ReturnSeries {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &value)| ReturnPoint {
                date: day(i as u32 + 2),
                value,
            })
            .collect();
        ReturnSeries::new("AAA", day(1), points).unwrap()
    }

    #[test]
    fn test_trough_and_duration() {
        // closes 100, 110, 99, 108.9
        let profile = DrawdownProfile::from_returns(&returns(&[0.1, -0.1, 0.1]));

        assert_eq!(profile.points.len(), 4);
        assert_abs_diff_eq!(profile.max_drawdown, -0.1, epsilon = 1e-12);
        assert_eq!(profile.peak_date, Some(day(2)));
        assert_eq!(profile.trough_date, Some(day(3)));
        assert_eq!(profile.duration_days, 1);
        assert_abs_diff_eq!(profile.points[3].drawdown, -0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_rising_series_has_no_drawdown() {
        let profile = DrawdownProfile::from_returns(&returns(&[0.01, 0.02, 0.005]));
        assert_eq!(profile.max_drawdown, 0.0);
        assert_eq!(profile.trough_date, None);
        assert_eq!(profile.duration_days, 0);
        assert!(profile.drawdowns().iter().all(|d| *d == 0.0));
    }

    #[test]
    fn test_fall_from_the_start_measures_from_base_date() {
        let profile = DrawdownProfile::from_returns(&returns(&[-0.5, 0.2, -0.1]));
        assert_eq!(profile.peak_date, Some(day(1)));
        assert_eq!(profile.trough_date, Some(day(2)));
        assert_abs_diff_eq!(profile.max_drawdown, -0.5, epsilon = 1e-12);
        assert!(profile.points.iter().all(|p| p.drawdown <= 0.0));
    }
}
