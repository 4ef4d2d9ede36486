use analytics::RiskLevel;
use chrono::{Duration, NaiveDate};
use configuration::Config;
use market_data::{CsvHistoryProvider, FixedBenchmark};
use meridian::Meridian;
use signals::TrendLabel;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

const BENCHMARK: &str = "INDEX";

fn write_csv(dir: &Path, symbol: &str, closes: &[f64]) {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut text = String::from("date,open,high,low,close,volume\n");
    for (i, close) in closes.iter().enumerate() {
        let date = start + Duration::days(i as i64);
        writeln!(text, "{date},,,,{close:.4},").unwrap();
    }
    fs::write(dir.join(format!("{symbol}.csv")), text).unwrap();
}

/// A drifting series with a deterministic wobble.
fn path(n: usize, drift: f64, wobble: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 * (1.0 + drift).powf(t) * (1.0 + wobble * (t * 0.7).sin())
        })
        .collect()
}

fn fixture() -> TempDir {
    let dir = tempdir().unwrap();
    write_csv(dir.path(), BENCHMARK, &path(300, 0.0004, 0.004));
    write_csv(dir.path(), "FAST", &path(300, 0.0015, 0.010));
    write_csv(dir.path(), "SLOW", &path(300, 0.0002, 0.002));
    write_csv(dir.path(), "WILD", &path(300, 0.0008, 0.030));
    dir
}

fn run<T>(dir: &Path, f: impl FnOnce(&Meridian) -> T) -> T {
    let config = Config::default();
    let provider = CsvHistoryProvider::new(dir);
    let benchmarks = FixedBenchmark::new(BENCHMARK);
    f(&Meridian::new(&config, &provider, &benchmarks))
}

#[test]
fn analyze_builds_every_section() {
    let dir = fixture();
    let out = run(dir.path(), |app| app.analyze("FAST", None, None)).unwrap();

    assert_eq!(out.metrics.symbol, "FAST");
    assert_eq!(out.metrics.benchmark, BENCHMARK);
    assert_eq!(out.metrics.days_analyzed, 299);
    assert!(out.metrics.total_return > out.metrics.benchmark_total_return);
    assert!(out.metrics.max_drawdown <= 0.0);
    assert!(out.metrics.beta.is_defined());

    let distribution = out.distribution.unwrap();
    assert_eq!(distribution.observations, 299);
    assert_eq!(out.summary.unwrap().symbol, "FAST");
    assert!(out.trend.is_some());
    assert!(out.signals.is_some());
    assert!(out.fundamentals.is_none());
    // Beta near 2.5 is the only risk contributor.
    assert_eq!(out.risk.level, RiskLevel::Moderate);
}

#[test]
fn analyze_scores_fundamentals_from_json() {
    let dir = fixture();
    let file = dir.path().join("fast.json");
    fs::write(
        &file,
        r#"{"pe_ratio": "10", "return_on_equity": "0.25", "current_ratio": "1.2"}"#,
    )
    .unwrap();

    let out = run(dir.path(), |app| app.analyze("FAST", None, Some(&file))).unwrap();
    assert_eq!(out.fundamentals.unwrap().score, 25 + 20 + 5);
}

#[test]
fn explicit_benchmark_must_exist() {
    let dir = fixture();
    let err = run(dir.path(), |app| app.analyze("FAST", Some("MISSING"), None)).unwrap_err();
    assert!(format!("{err:#}").contains("benchmark"));

    let ok = run(dir.path(), |app| app.analyze("FAST", Some("SLOW"), None)).unwrap();
    assert_eq!(ok.metrics.benchmark, "SLOW");
}

#[test]
fn indicators_read_a_steady_rise_as_bullish() {
    let dir = tempdir().unwrap();
    let closes: Vec<f64> = (0..250).map(|i| 50.0 + i as f64 * 0.5).collect();
    write_csv(dir.path(), "UP", &closes);

    let out = run(dir.path(), |app| app.indicators("UP")).unwrap();
    assert_eq!(out.bars, 250);
    assert_eq!(out.latest.rsi, Some(100.0));
    assert_eq!(out.trend.label, TrendLabel::Bullish);
    assert_eq!(out.trend.confidence, 100.0);
}

#[test]
fn compare_ranks_and_skips_unknown_symbols() {
    let dir = fixture();
    let symbols: Vec<String> = ["FAST", "SLOW", "WILD", "NOPE"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let out = run(dir.path(), |app| app.compare(&symbols)).unwrap();

    assert_eq!(out.ranking.len(), 3);
    assert!(out.ranking.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(out.skipped.len(), 1);
    assert_eq!(out.skipped[0].0, "NOPE");

    let summary = out.summary;
    assert_eq!(summary.best_performer.unwrap().symbol, "FAST");
    assert_eq!(summary.lowest_volatility.unwrap().symbol, "SLOW");
    assert!(summary.excess_over_benchmark.unwrap() > 0.0);
}

#[test]
fn compare_with_only_unknown_symbols_lists_them_as_skipped() {
    let dir = fixture();
    let symbols = vec!["NOPE".to_string(), "NADA".to_string()];

    let out = run(dir.path(), |app| app.compare(&symbols)).unwrap();

    assert!(out.ranking.is_empty());
    assert!(out.summary.best_performer.is_none());
    let skipped: Vec<&str> = out.skipped.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(skipped, vec!["NOPE", "NADA"]);
}
