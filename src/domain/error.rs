//! Domain error types.
//!
//! The simulation core never fails; these errors come from configuration,
//! rule decoding, bar loading, and persistence.

/// Top-level error type for backtester.
#[derive(Debug, thiserror::Error)]
pub enum BacktestError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("rule parse error: {reason}")]
    RuleParse { reason: String },

    #[error("invalid rule: {reason}")]
    RuleInvalid { reason: String },

    #[error("failed to read {path}: {reason}")]
    DataRead { path: String, reason: String },

    #[error("invalid data at line {line}: {reason}")]
    DataInvalid { line: usize, reason: String },

    #[error("no data found in {source_name}")]
    NoData { source_name: String },

    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for BacktestError {
    fn from(err: serde_json::Error) -> Self {
        BacktestError::RuleParse {
            reason: err.to_string(),
        }
    }
}

impl From<&BacktestError> for std::process::ExitCode {
    fn from(err: &BacktestError) -> Self {
        let code: u8 = match err {
            BacktestError::Io(_) => 1,
            BacktestError::ConfigParse { .. } | BacktestError::ConfigInvalid { .. } => 2,
            BacktestError::Storage { .. } | BacktestError::NotFound { .. } => 3,
            BacktestError::RuleParse { .. } | BacktestError::RuleInvalid { .. } => 4,
            BacktestError::DataRead { .. }
            | BacktestError::DataInvalid { .. }
            | BacktestError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
