//! INI file configuration adapter.

use crate::domain::error::BacktestError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BacktestError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| BacktestError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, BacktestError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| BacktestError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// An adapter with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ini_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_all_sections() {
        let content = r#"
[backtest]
initial_balance = 10000.0
commission = 0.001

[data]
base_path = /srv/prices

[storage]
dir = /var/lib/backtester
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("data", "base_path"),
            Some("/srv/prices".to_string())
        );
        assert_eq!(
            adapter.get_string("storage", "dir"),
            Some("/var/lib/backtester".to_string())
        );
        assert_eq!(
            adapter.get_string("backtest", "commission"),
            Some("0.001".to_string())
        );
    }

    #[test]
    fn missing_keys_and_sections_are_none() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\ninitial_balance = 100\n").unwrap();
        assert_eq!(adapter.get_string("backtest", "missing"), None);
        assert_eq!(adapter.get_string("strategy", "initial_balance"), None);
    }

    #[test]
    fn get_string_or_falls_back() {
        let adapter = FileConfigAdapter::from_string("[data]\nbase_path = csv\n").unwrap();
        assert_eq!(adapter.get_string_or("data", "base_path", "."), "csv");
        assert_eq!(adapter.get_string_or("storage", "dir", "."), ".");
    }

    #[test]
    fn values_are_returned_verbatim() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\ninitial_balance = not_a_number\n").unwrap();
        assert_eq!(
            adapter.get_string("backtest", "initial_balance"),
            Some("not_a_number".to_string())
        );
    }

    #[test]
    fn empty_adapter_has_no_values() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("backtest", "commission"), None);
        assert_eq!(adapter.get_string_or("backtest", "commission", "0.5"), "0.5");
    }

    #[test]
    fn loads_from_disk() {
        let file = ini_file("[storage]\ndir = /tmp/history\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("storage", "dir"),
            Some("/tmp/history".to_string())
        );
    }

    #[test]
    fn missing_file_is_parse_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/backtester.ini");
        assert!(matches!(result, Err(BacktestError::ConfigParse { .. })));
    }
}
