//! # Meridian
//!
//! The host layer: fetches price history through a `market-data` provider, runs the
//! analytics, indicator and signal crates over it, and returns plain serializable outputs
//! for the binary to render.

use analytics::{
    AnalyticsEngine, EngineParams, MetricsReport, PriceSummary, ReturnDistribution,
    RiskAssessment,
};
use analyzer::{Analyzer, ComparisonSummary, RankedReport};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use configuration::Config;
use core_types::PriceSeries;
use indicators::{IndicatorFrame, IndicatorSnapshot};
use market_data::{BenchmarkResolver, PriceHistoryProvider};
use serde::Serialize;
use signals::{
    FundamentalScore, FundamentalSnapshot, FundamentalsScorer, TechnicalSignals, TrendScorer,
    TrendSignal, technical_signals,
};
use std::path::Path;

/// Everything `meridian analyze` reports for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    pub summary: Option<PriceSummary>,
    pub metrics: MetricsReport,
    pub risk: RiskAssessment,
    pub distribution: Option<ReturnDistribution>,
    pub trend: Option<TrendSignal>,
    pub signals: Option<TechnicalSignals>,
    pub fundamentals: Option<FundamentalScore>,
}

/// The latest indicator row with the signals read from it.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorsOutput {
    pub symbol: String,
    pub bars: usize,
    pub latest: IndicatorSnapshot,
    pub trend: TrendSignal,
    pub signals: TechnicalSignals,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutput {
    pub summary: ComparisonSummary,
    pub ranking: Vec<RankedReport>,
    /// Symbols that could not be analyzed, with the reason.
    pub skipped: Vec<(String, String)>,
}

/// Wires the providers to the pure crates. Holds no state besides configuration.
pub struct Meridian<'a> {
    config: &'a Config,
    provider: &'a dyn PriceHistoryProvider,
    benchmarks: &'a dyn BenchmarkResolver,
}

impl<'a> Meridian<'a> {
    pub fn new(
        config: &'a Config,
        provider: &'a dyn PriceHistoryProvider,
        benchmarks: &'a dyn BenchmarkResolver,
    ) -> Self {
        Self {
            config,
            provider,
            benchmarks,
        }
    }

    fn engine(&self) -> AnalyticsEngine {
        AnalyticsEngine::new(EngineParams::from_settings(&self.config.analysis))
    }

    /// Loads the full history; the engine applies the lookback window itself.
    fn history(&self, symbol: &str) -> Result<PriceSeries> {
        self.provider
            .fetch_history(symbol, NaiveDate::MIN, NaiveDate::MAX)
            .with_context(|| format!("Failed to load price history for {symbol}"))
    }

    fn benchmark_history(&self, symbol: &str, benchmark: Option<&str>) -> Result<PriceSeries> {
        let result = match benchmark {
            Some(b) => self.provider.fetch_history(b, NaiveDate::MIN, NaiveDate::MAX),
            None => self.benchmarks.fetch_benchmark(
                self.provider,
                symbol,
                NaiveDate::MIN,
                NaiveDate::MAX,
            ),
        };
        result.with_context(|| format!("Failed to load benchmark history for {symbol}"))
    }

    /// The report plus the aligned daily asset returns it was computed from.
    fn metrics(
        &self,
        asset: &PriceSeries,
        benchmark: &PriceSeries,
    ) -> Result<(MetricsReport, Vec<f64>)> {
        let engine = self.engine();
        let pair = engine.return_builder().build(asset, benchmark).with_context(|| {
            format!("Failed to align {} with {}", asset.symbol(), benchmark.symbol())
        })?;
        let report = engine
            .calculate(&pair)
            .with_context(|| format!("Failed to calculate metrics for {}", asset.symbol()))?;
        Ok((report, pair.asset().values()))
    }

    fn technicals(
        &self,
        series: &PriceSeries,
    ) -> Result<Option<(IndicatorSnapshot, TrendSignal, TechnicalSignals)>> {
        let settings = &self.config.indicators;
        let frame = IndicatorFrame::compute(series, settings)
            .with_context(|| format!("Failed to compute indicators for {}", series.symbol()))?;
        let Some(latest) = frame.latest() else {
            return Ok(None);
        };
        let trend = TrendScorer::from_settings(settings)?.score_snapshot(&latest);
        let signals = technical_signals(&latest, settings);
        Ok(Some((latest, trend, signals)))
    }

    /// Full report for one symbol. `fundamentals`, when given, is a JSON file holding a
    /// [`FundamentalSnapshot`].
    pub fn analyze(
        &self,
        symbol: &str,
        benchmark: Option<&str>,
        fundamentals: Option<&Path>,
    ) -> Result<AnalysisOutput> {
        let asset = self.history(symbol)?;
        let bench = self.benchmark_history(symbol, benchmark)?;
        let (metrics, returns) = self.metrics(&asset, &bench)?;
        tracing::info!(
            "{} vs {}: {} days analyzed over {}",
            metrics.symbol,
            metrics.benchmark,
            metrics.days_analyzed,
            metrics.period_label
        );

        let technicals = self.technicals(&asset)?;
        let fundamentals = fundamentals
            .map(|path| load_fundamentals(path).map(|s| FundamentalsScorer::default().score(&s)))
            .transpose()?;

        Ok(AnalysisOutput {
            summary: PriceSummary::from_series(&asset),
            risk: RiskAssessment::from_report(&metrics),
            distribution: ReturnDistribution::from_returns(&returns),
            trend: technicals.as_ref().map(|(_, trend, _)| trend.clone()),
            signals: technicals.map(|(_, _, signals)| signals),
            fundamentals,
            metrics,
        })
    }

    pub fn indicators(&self, symbol: &str) -> Result<IndicatorsOutput> {
        let series = self.history(symbol)?;
        let (latest, trend, signals) = self
            .technicals(&series)?
            .with_context(|| format!("No price history for {symbol}"))?;
        Ok(IndicatorsOutput {
            symbol: symbol.to_string(),
            bars: series.len(),
            latest,
            trend,
            signals,
        })
    }

    /// Analyzes each symbol against its benchmark, then ranks and compares the results.
    /// A symbol that fails is skipped with a warning rather than failing the comparison.
    pub fn compare(&self, symbols: &[String]) -> Result<ComparisonOutput> {
        let mut reports = Vec::with_capacity(symbols.len());
        let mut skipped = Vec::new();

        for symbol in symbols {
            let outcome = self
                .history(symbol)
                .and_then(|asset| Ok((self.benchmark_history(symbol, None)?, asset)))
                .and_then(|(bench, asset)| self.metrics(&asset, &bench));
            match outcome {
                Ok((report, _)) => reports.push(report),
                Err(e) => {
                    tracing::warn!("Skipping {}: {:#}", symbol, e);
                    skipped.push((symbol.clone(), format!("{e:#}")));
                }
            }
        }

        let summary = ComparisonSummary::from_reports(&reports);
        // With nothing analyzable the skipped list is the whole answer.
        let ranking = if reports.is_empty() {
            Vec::new()
        } else {
            Analyzer::new(self.config.ranking.clone()).rank(reports)?
        };
        Ok(ComparisonOutput {
            summary,
            ranking,
            skipped,
        })
    }
}

pub fn load_fundamentals(path: &Path) -> Result<FundamentalSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fundamentals from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid fundamentals JSON in {}", path.display()))
}
