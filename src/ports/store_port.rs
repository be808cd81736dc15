//! Persistence port traits for saved strategies and run history.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;
use crate::domain::history::{self, HistoryEntry};
use crate::domain::strategy::{StoredStrategy, StrategyRules};

pub trait StrategyStore {
    fn save_strategy(&self, name: &str, rules: &StrategyRules)
        -> Result<StoredStrategy, BacktestError>;

    fn load_strategies(&self) -> Result<Vec<StoredStrategy>, BacktestError>;
}

pub trait HistoryStore {
    fn save_simulation(
        &self,
        result: &BacktestResult,
        rules: &StrategyRules,
        initial_balance: f64,
        file_name: &str,
    ) -> Result<HistoryEntry, BacktestError>;

    fn load_history(&self) -> Result<Vec<HistoryEntry>, BacktestError>;

    /// Default implementation: scans `load_history` for the newest entry.
    fn latest_history(&self) -> Result<Option<HistoryEntry>, BacktestError> {
        let entries = self.load_history()?;
        Ok(history::latest(&entries).cloned())
    }

    /// Default implementation: scans `load_history` for a matching id.
    fn history_by_id(&self, id: &str) -> Result<HistoryEntry, BacktestError> {
        self.load_history()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| BacktestError::NotFound {
                kind: "history entry".to_string(),
                id: id.to_string(),
            })
    }
}
