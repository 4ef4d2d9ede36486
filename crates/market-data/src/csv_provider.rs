use crate::PriceHistoryProvider;
use crate::error::DataError;
use chrono::NaiveDate;
use core_types::{PriceSeries, RawBar};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// One CSV row. Header names are matched case-insensitively through aliases so both
/// `date,open,...` and Yahoo-style `Date,Open,...,Adj Close,Volume` exports load.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open", default)]
    open: Option<Decimal>,
    #[serde(alias = "High", default)]
    high: Option<Decimal>,
    #[serde(alias = "Low", default)]
    low: Option<Decimal>,
    #[serde(alias = "Close", default)]
    close: Option<Decimal>,
    #[serde(alias = "Volume", default)]
    volume: Option<Decimal>,
}

impl From<CsvRow> for RawBar {
    fn from(row: CsvRow) -> Self {
        RawBar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

/// Reads `<directory>/<SYMBOL>.csv`.
#[derive(Debug, Clone)]
pub struct CsvHistoryProvider {
    directory: PathBuf,
}

impl CsvHistoryProvider {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.directory.join(format!("{symbol}.csv"))
    }

    /// Parses raw rows from any reader. Rows are sorted by date; the series itself
    /// rejects duplicates.
    pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawBar>, DataError> {
        let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let row: CsvRow = result?;
            rows.push(RawBar::from(row));
        }
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }

    fn open(&self, symbol: &str) -> Result<File, DataError> {
        let path = self.path_for(symbol);
        if !Path::new(&path).exists() {
            return Err(DataError::NotFound {
                symbol: symbol.to_string(),
                path,
            });
        }
        Ok(File::open(path)?)
    }
}

impl PriceHistoryProvider for CsvHistoryProvider {
    fn fetch_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        if from > to {
            return Err(DataError::InvalidData(
                symbol.to_string(),
                format!("start date {from} is after end date {to}"),
            ));
        }

        let rows: Vec<RawBar> = Self::read_rows(self.open(symbol)?)?
            .into_iter()
            .filter(|r| r.date >= from && r.date <= to)
            .collect();
        tracing::debug!(
            "Loaded {} rows for {} from {}",
            rows.len(),
            symbol,
            self.directory.display()
        );

        Ok(PriceSeries::from_raw(symbol, rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reads_yahoo_style_headers_and_blank_close() {
        let data = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-03,101,103,100,102.5,102.5,1200
2024-01-02,100,101,99,100.25,100.25,1000
2024-01-04,102,104,101,,,
";
        let rows = CsvHistoryProvider::read_rows(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(rows[0].close, Some(dec!(100.25)));
        assert_eq!(rows[2].close, None);

        let series = PriceSeries::from_raw("AAA", rows).unwrap();
        assert_eq!(series.len(), 2);
    }
}
