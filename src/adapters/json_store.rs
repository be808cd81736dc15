//! JSON file persistence for saved strategies and run history.
//!
//! Each collection is a pretty-printed JSON array in its own file under the
//! store directory. A missing file reads as an empty collection.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;
use crate::domain::history::HistoryEntry;
use crate::domain::strategy::{StoredStrategy, StrategyRules};
use crate::ports::store_port::{HistoryStore, StrategyStore};

pub const STRATEGIES_FILE: &str = "strategies.json";
pub const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_list<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>, BacktestError> {
        let path = self.dir.join(file_name);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(&path, e)),
        };

        let items: Vec<T> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_error(&path, e))?;
        debug!(path = %path.display(), count = items.len(), "loaded collection");
        Ok(items)
    }

    fn write_list<T: Serialize>(&self, file_name: &str, items: &[T]) -> Result<(), BacktestError> {
        fs::create_dir_all(&self.dir).map_err(|e| storage_error(&self.dir, e))?;

        let path = self.dir.join(file_name);
        let file = File::create(&path).map_err(|e| storage_error(&path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, items).map_err(|e| storage_error(&path, e))?;
        writer.flush().map_err(|e| storage_error(&path, e))?;
        debug!(path = %path.display(), count = items.len(), "saved collection");
        Ok(())
    }
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> BacktestError {
    BacktestError::Storage {
        reason: format!("{}: {}", path.display(), err),
    }
}

impl StrategyStore for JsonStore {
    fn save_strategy(
        &self,
        name: &str,
        rules: &StrategyRules,
    ) -> Result<StoredStrategy, BacktestError> {
        let mut strategies: Vec<StoredStrategy> = self.read_list(STRATEGIES_FILE)?;
        let stored = StoredStrategy {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            rules: rules.clone(),
        };
        strategies.push(stored.clone());
        self.write_list(STRATEGIES_FILE, &strategies)?;

        info!(id = %stored.id, name, "strategy saved");
        Ok(stored)
    }

    fn load_strategies(&self) -> Result<Vec<StoredStrategy>, BacktestError> {
        self.read_list(STRATEGIES_FILE)
    }
}

impl HistoryStore for JsonStore {
    fn save_simulation(
        &self,
        result: &BacktestResult,
        rules: &StrategyRules,
        initial_balance: f64,
        file_name: &str,
    ) -> Result<HistoryEntry, BacktestError> {
        let mut history: Vec<HistoryEntry> = self.read_list(HISTORY_FILE)?;
        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            file_name: file_name.to_string(),
            rules: rules.clone(),
            initial_balance,
            result: result.clone(),
        };
        history.push(entry.clone());
        self.write_list(HISTORY_FILE, &history)?;

        info!(id = %entry.id, file_name, "simulation saved to history");
        Ok(entry)
    }

    fn load_history(&self) -> Result<Vec<HistoryEntry>, BacktestError> {
        self.read_list(HISTORY_FILE)
    }
}
