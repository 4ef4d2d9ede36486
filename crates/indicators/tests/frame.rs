use chrono::{Duration, NaiveDate};
use configuration::IndicatorSettings;
use core_types::PriceSeries;
use indicators::{Crossover, IndicatorFrame};
use rust_decimal::Decimal;

fn series(closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let rows: Vec<_> = closes
        .iter()
        .enumerate()
        .map(|(i, c)| {
            (
                start + Duration::days(i as i64),
                Decimal::from_f64_retain(*c).unwrap().round_dp(4),
            )
        })
        .collect();
    PriceSeries::from_closes("AAA", &rows).unwrap()
}

/// A rise, a slide and a recovery, with some day-to-day noise.
fn cycle(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + 20.0 * (t / 40.0).sin() + 1.5 * ((i * 7 % 5) as f64 - 2.0)
        })
        .collect()
}

#[test]
fn columns_share_the_series_length() {
    let frame =
        IndicatorFrame::compute(&series(&cycle(260)), &IndicatorSettings::default()).unwrap();

    assert_eq!(frame.len(), 260);
    for column in frame.sma.values().chain(frame.ema.values()) {
        assert_eq!(column.len(), 260);
    }
    assert_eq!(frame.rsi.len(), 260);
    assert_eq!(frame.bb_width.len(), 260);
    assert!(frame.sma[&200][..199].iter().all(Option::is_none));
    assert!(frame.sma[&200][199].is_some());
    assert!(frame.ema[&12].iter().all(Option::is_some));
}

#[test]
fn rsi_stays_within_bounds() {
    let frame =
        IndicatorFrame::compute(&series(&cycle(260)), &IndicatorSettings::default()).unwrap();
    let values: Vec<f64> = frame.rsi.iter().flatten().copied().collect();

    assert!(!values.is_empty());
    assert!(values.iter().all(|v| (0.0..=100.0).contains(v)));
}

#[test]
fn histogram_flips_on_the_crossing_bar() {
    let frame =
        IndicatorFrame::compute(&series(&cycle(260)), &IndicatorSettings::default()).unwrap();

    let mut crossings = 0;
    for i in 1..frame.len() {
        let prev = frame.macd_histogram[i - 1].unwrap();
        let curr = frame.macd_histogram[i].unwrap();
        let row = frame.row(i).unwrap();
        match row.macd_crossover {
            Some(Crossover::Above) => {
                crossings += 1;
                assert!(prev <= 0.0 && curr > 0.0);
            }
            Some(Crossover::Below) => {
                crossings += 1;
                assert!(prev >= 0.0 && curr < 0.0);
            }
            None => assert!(!(prev <= 0.0 && curr > 0.0) && !(prev >= 0.0 && curr < 0.0)),
        }
    }
    assert!(crossings > 0);
}

#[test]
fn short_series_leaves_indicators_absent() {
    let closes: Vec<f64> = (0..10).map(|i| 50.0 + i as f64).collect();
    let frame = IndicatorFrame::compute(&series(&closes), &IndicatorSettings::default()).unwrap();

    let latest = frame.latest().unwrap();
    assert_eq!(latest.sma(20), None);
    assert_eq!(latest.sma(200), None);
    assert_eq!(latest.rsi, None);
    assert_eq!(latest.bb_upper, None);
    assert!(latest.macd.is_some());
    assert!(latest.ema(26).is_some());
}

#[test]
fn twenty_rising_closes_read_100() {
    let closes: Vec<f64> = (0..20).map(|i| 10.0 + i as f64 * 0.5).collect();
    let frame = IndicatorFrame::compute(&series(&closes), &IndicatorSettings::default()).unwrap();
    assert_eq!(frame.latest().unwrap().rsi, Some(100.0));
}

#[test]
fn invalid_periods_are_rejected() {
    let settings = IndicatorSettings {
        macd_fast_period: 30,
        ..IndicatorSettings::default()
    };
    assert!(IndicatorFrame::compute(&series(&cycle(30)), &settings).is_err());

    let empty = PriceSeries::new("AAA", Vec::new()).unwrap();
    let frame = IndicatorFrame::compute(&empty, &IndicatorSettings::default()).unwrap();
    assert!(frame.is_empty());
    assert!(frame.latest().is_none());
}
