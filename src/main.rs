use analytics::{MetricValue, MetricsReport};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use configuration::{Config, LogFormat, load_config, load_config_from};
use market_data::{CsvHistoryProvider, FixedBenchmark};
use meridian::{AnalysisOutput, ComparisonOutput, IndicatorsOutput, Meridian};
use serde::Serialize;
use std::path::PathBuf;

/// The main entry point for the Meridian analytics application.
fn main() {
    // A missing .env file is fine; it only supplies MERIDIAN_* overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Risk, performance and technical analysis of daily price histories.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults to ./config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding one <SYMBOL>.csv per symbol. Overrides the configured one.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// Overrides the configured log format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Risk and performance metrics of a symbol against its benchmark.
    Analyze(AnalyzeArgs),
    /// The latest technical indicators, trend and signals of a symbol.
    Indicators(IndicatorsArgs),
    /// Rank several symbols and pick out the leaders.
    Compare(CompareArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// The symbol to analyze (e.g., "AAPL").
    symbol: String,

    /// The benchmark symbol. Defaults to the configured one.
    #[arg(long)]
    benchmark: Option<String>,

    /// A JSON file with the company's fundamentals to score as well.
    #[arg(long)]
    fundamentals: Option<PathBuf>,
}

#[derive(Parser)]
struct IndicatorsArgs {
    symbol: String,
}

#[derive(Parser)]
struct CompareArgs {
    #[arg(required = true, num_args = 1..)]
    symbols: Vec<String>,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config: Config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    if let Some(dir) = &cli.data_dir {
        config.data.directory = dir.clone();
    }

    // The guard flushes the file appender on drop, so it lives until `run` returns.
    let _guard = configuration::init_tracing(&config.logging)?;
    tracing::debug!("Reading price history from {}", config.data.directory.display());

    let provider = CsvHistoryProvider::new(&config.data.directory);
    let benchmarks = FixedBenchmark::new(config.analysis.benchmark.clone());
    let app = Meridian::new(&config, &provider, &benchmarks);

    match cli.command {
        Commands::Analyze(args) => {
            let output = app.analyze(
                &args.symbol,
                args.benchmark.as_deref(),
                args.fundamentals.as_deref(),
            )?;
            emit(cli.json, &output, print_analysis)
        }
        Commands::Indicators(args) => {
            let output = app.indicators(&args.symbol)?;
            emit(cli.json, &output, print_indicators)
        }
        Commands::Compare(args) => {
            let output = app.compare(&args.symbols)?;
            emit(cli.json, &output, print_comparison)
        }
    }
}

fn emit<T: Serialize>(json: bool, output: &T, table: fn(&T)) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else {
        table(output);
    }
    Ok(())
}

// ==============================================================================
// Table Rendering
// ==============================================================================

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(Cell::new));
    table
}

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn ratio(value: &MetricValue) -> String {
    match value.value() {
        Some(v) => format!("{v:.3}"),
        None => value.to_string(),
    }
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn metrics_table(r: &MetricsReport) -> Table {
    let mut table = new_table(&["Metric", "Value"]);
    let pair = |a: f64, b: f64| format!("{} / {}", pct(a), pct(b));
    let rows: Vec<(&str, String)> = vec![
        ("Period", format!("{} ({} to {})", r.period_label, r.start_date, r.end_date)),
        ("Days analyzed", r.days_analyzed.to_string()),
        ("Total return", pct(r.total_return)),
        ("Benchmark return", format!("{} ({})", pct(r.benchmark_total_return), r.benchmark)),
        ("Mean daily return", pct(r.mean_daily_return)),
        ("Beta", ratio(&r.beta)),
        ("Alpha", ratio(&r.alpha)),
        ("Correlation", ratio(&r.correlation)),
        ("R squared", ratio(&r.r_squared)),
        ("CAPM expected return", pct(r.capm_expected_return)),
        ("Tracking error", pct(r.tracking_error)),
        ("Information ratio", ratio(&r.information_ratio)),
        ("Sharpe ratio", ratio(&r.sharpe_ratio)),
        ("Sortino ratio", ratio(&r.sortino_ratio)),
        ("Treynor ratio", ratio(&r.treynor_ratio)),
        ("Annual volatility", pct(r.volatility_annual)),
        ("VaR 95% (daily / annual)", pair(r.var_95_daily, r.var_95_annual)),
        ("VaR 99% (daily / annual)", pair(r.var_99_daily, r.var_99_annual)),
        ("CVaR 95% (daily / annual)", pair(r.cvar_95_daily, r.cvar_95_annual)),
        ("Max drawdown", pct(r.max_drawdown)),
        ("Drawdown duration", format!("{} days", r.max_drawdown_duration_days)),
        ("Skewness", ratio(&r.skewness)),
        ("Excess kurtosis", ratio(&r.kurtosis)),
        (
            "Longest gain / loss streak",
            format!("{} / {}", r.max_consecutive_gains, r.max_consecutive_losses),
        ),
        ("Probability of loss", format!("{:.1}%", r.probability_of_loss_pct)),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    table
}

fn print_analysis(out: &AnalysisOutput) {
    let r = &out.metrics;
    println!("\n{} vs {}", r.symbol, r.benchmark);

    if let Some(s) = &out.summary {
        println!(
            "Last close {} on {} | range {} - {} | total {:.2}% | last day {}% | daily vol {}%",
            s.last_close,
            s.last_date,
            s.min_close,
            s.max_close,
            s.total_variation_pct,
            opt(s.last_day_variation_pct),
            opt(s.daily_volatility_pct),
        );
    }
    println!("{}", metrics_table(r));
    println!("Risk level: {} (score {})", out.risk.level, out.risk.score);

    if let Some(d) = &out.distribution {
        let mut table = new_table(&["Percentile", "Daily return"]);
        for (p, v) in &d.percentiles {
            table.add_row(vec![format!("{p:.0}"), pct(*v)]);
        }
        println!(
            "\nDistribution: mean {} | median {} | std {} | normal: {}",
            pct(d.mean),
            pct(d.median),
            pct(d.std_dev),
            if d.is_normal { "yes" } else { "no" }
        );
        println!("{table}");
    }

    if let Some(trend) = &out.trend {
        println!(
            "\nTrend: {} ({:.0}% confidence, {} bull / {} bear points)",
            trend.label, trend.confidence, trend.bullish_points, trend.bearish_points
        );
    }
    if let Some(signals) = &out.signals {
        for s in &signals.signals {
            println!("  {:?} {:?} [{}] {}", s.strength, s.action, s.indicator, s.reason);
        }
    }
    if let Some(f) = &out.fundamentals {
        println!("\nFundamentals score: {}/100", f.score);
    }

    let undefined = r.undefined_metrics();
    if !undefined.is_empty() {
        println!("\nUndefined for this window: {}", undefined.join(", "));
    }
}

fn print_indicators(out: &IndicatorsOutput) {
    let s = &out.latest;
    println!("\n{} on {} ({} bars)", out.symbol, s.date, out.bars);

    let mut table = new_table(&["Indicator", "Value"]);
    table.add_row(vec!["Close".to_string(), format!("{:.2}", s.close)]);
    for (period, value) in &s.sma {
        table.add_row(vec![format!("SMA {period}"), opt(*value)]);
    }
    for (period, value) in &s.ema {
        table.add_row(vec![format!("EMA {period}"), opt(*value)]);
    }
    table.add_row(vec!["RSI".to_string(), opt(s.rsi)]);
    table.add_row(vec!["MACD".to_string(), opt(s.macd)]);
    table.add_row(vec!["MACD signal".to_string(), opt(s.macd_signal)]);
    table.add_row(vec!["MACD histogram".to_string(), opt(s.macd_histogram)]);
    table.add_row(vec!["Bollinger upper".to_string(), opt(s.bb_upper)]);
    table.add_row(vec!["Bollinger middle".to_string(), opt(s.bb_middle)]);
    table.add_row(vec!["Bollinger lower".to_string(), opt(s.bb_lower)]);
    table.add_row(vec!["Bollinger width".to_string(), opt(s.bb_width)]);
    println!("{table}");

    println!(
        "Trend: {} ({:.0}% confidence) | signals: {:?}",
        out.trend.label, out.trend.confidence, out.signals.summary
    );
    for sig in &out.signals.signals {
        println!("  {:?} {:?} [{}] {}", sig.strength, sig.action, sig.indicator, sig.reason);
    }
}

fn print_comparison(out: &ComparisonOutput) {
    let mut table = new_table(&[
        "Rank", "Symbol", "Score", "Return", "Sharpe", "Sortino", "Volatility", "Max DD",
    ]);
    for (i, ranked) in out.ranking.iter().enumerate() {
        let r = &ranked.report;
        table.add_row(vec![
            (i + 1).to_string(),
            r.symbol.clone(),
            format!("{:.3}", ranked.score),
            pct(r.total_return),
            ratio(&r.sharpe_ratio),
            ratio(&r.sortino_ratio),
            pct(r.volatility_annual),
            pct(r.max_drawdown),
        ]);
    }
    println!("{table}");

    let s = &out.summary;
    if let Some(best) = &s.best_performer {
        println!(
            "Best performer: {} ({}, {} over benchmark)",
            best.symbol,
            pct(best.value),
            s.excess_over_benchmark.map_or_else(|| "-".to_string(), pct)
        );
    }
    if let Some(l) = &s.best_sharpe {
        println!("Best Sharpe: {} ({:.3})", l.symbol, l.value);
    }
    if let Some(l) = &s.lowest_volatility {
        println!("Lowest volatility: {} ({})", l.symbol, pct(l.value));
    }
    if let Some(l) = &s.shallowest_drawdown {
        println!("Shallowest drawdown: {} ({})", l.symbol, pct(l.value));
    }
    for (symbol, reason) in &out.skipped {
        println!("Skipped {symbol}: {reason}");
    }
}
