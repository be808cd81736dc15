//! Saved backtest runs.

use serde::{Deserialize, Serialize};

use super::backtest::BacktestResult;
use super::strategy::StrategyRules;

/// A backtest result with the metadata needed to find it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    /// Milliseconds since the Unix epoch, UTC.
    pub timestamp: i64,
    pub file_name: String,
    pub rules: StrategyRules,
    pub initial_balance: f64,
    #[serde(flatten)]
    pub result: BacktestResult,
}

/// Most recent entry by timestamp; ties go to the later position.
pub fn latest(entries: &[HistoryEntry]) -> Option<&HistoryEntry> {
    entries.iter().max_by_key(|e| e.timestamp)
}
