//! CSV file data adapter.
//!
//! Expects a header row followed by `timestamp,open,high,low,close,volume`
//! records. Sources are resolved relative to the adapter's base path.

use crate::domain::error::BacktestError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, source: &str) -> PathBuf {
        self.base_path.join(source)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, source: &str) -> Result<Vec<Bar>, BacktestError> {
        let path = self.csv_path(source);
        let content = fs::read_to_string(&path).map_err(|e| BacktestError::DataRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let bars = parse_bars(&content)?;
        debug!(path = %path.display(), bars = bars.len(), "loaded bars");
        Ok(bars)
    }
}

/// Parse CSV text into bars, rejecting non-numeric fields and timestamps
/// that do not strictly increase.
pub fn parse_bars(content: &str) -> Result<Vec<Bar>, BacktestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut bars: Vec<Bar> = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        // header is line 1
        let fallback_line = row + 2;
        let record = result.map_err(|e| BacktestError::DataInvalid {
            line: e
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(fallback_line),
            reason: e.to_string(),
        })?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        let raw_ts = column(&record, 0, line)?;
        let timestamp: i64 = raw_ts.parse().map_err(|_| BacktestError::DataInvalid {
            line,
            reason: format!("invalid timestamp value '{}'", raw_ts),
        })?;

        if let Some(prev) = bars.last() {
            if timestamp <= prev.timestamp {
                return Err(BacktestError::DataInvalid {
                    line,
                    reason: format!(
                        "timestamp {} does not follow {}",
                        timestamp, prev.timestamp
                    ),
                });
            }
        }

        bars.push(Bar {
            timestamp,
            open: number(&record, 1, line)?,
            high: number(&record, 2, line)?,
            low: number(&record, 3, line)?,
            close: number(&record, 4, line)?,
            volume: number(&record, 5, line)?,
        });
    }

    Ok(bars)
}

fn column(record: &csv::StringRecord, idx: usize, line: usize) -> Result<&str, BacktestError> {
    record.get(idx).ok_or_else(|| BacktestError::DataInvalid {
        line,
        reason: format!("missing {} column", COLUMNS[idx]),
    })
}

fn number(record: &csv::StringRecord, idx: usize, line: usize) -> Result<f64, BacktestError> {
    let raw = column(record, idx, line)?;
    raw.parse().map_err(|_| BacktestError::DataInvalid {
        line,
        reason: format!("invalid {} value '{}'", COLUMNS[idx], raw),
    })
}
