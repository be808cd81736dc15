//! Configuration and strategy validation.
//!
//! Checks run before a backtest starts; the simulator itself assumes valid
//! inputs.

use crate::domain::backtest::{BacktestConfig, DEFAULT_COMMISSION, DEFAULT_INITIAL_BALANCE};
use crate::domain::enrich::unresolvable_fields;
use crate::domain::error::BacktestError;
use crate::domain::strategy::StrategyRules;
use crate::ports::config_port::ConfigPort;

/// Deepest rule nesting accepted from a rules file.
pub const MAX_RULE_DEPTH: usize = 32;

/// Read `[backtest]` settings, falling back to defaults for absent keys.
pub fn backtest_config_from_port(config: &dyn ConfigPort) -> Result<BacktestConfig, BacktestError> {
    let backtest = BacktestConfig {
        initial_balance: read_double(config, "backtest", "initial_balance", DEFAULT_INITIAL_BALANCE)?,
        commission: read_double(config, "backtest", "commission", DEFAULT_COMMISSION)?,
    };
    validate_backtest_config(&backtest)?;
    Ok(backtest)
}

pub fn validate_backtest_config(config: &BacktestConfig) -> Result<(), BacktestError> {
    validate_initial_balance(config.initial_balance)?;
    validate_commission(config.commission)?;
    Ok(())
}

/// Reject rules that reference fields no snapshot can carry, or that nest
/// deeper than [`MAX_RULE_DEPTH`].
pub fn validate_strategy_rules(rules: &StrategyRules) -> Result<(), BacktestError> {
    let unknown = unresolvable_fields(rules);
    if !unknown.is_empty() {
        return Err(BacktestError::RuleInvalid {
            reason: format!("unknown fields: {}", unknown.join(", ")),
        });
    }

    for (name, rule) in [("entry", &rules.entry), ("exit", &rules.exit)] {
        if rule.depth() > MAX_RULE_DEPTH {
            return Err(BacktestError::RuleInvalid {
                reason: format!("{} rule nests deeper than {}", name, MAX_RULE_DEPTH),
            });
        }
    }
    Ok(())
}

fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, BacktestError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| BacktestError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("'{}' is not a number", raw),
            }),
    }
}

fn validate_initial_balance(value: f64) -> Result<(), BacktestError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(BacktestError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_balance".to_string(),
            reason: "initial_balance must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_commission(value: f64) -> Result<(), BacktestError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(BacktestError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "commission".to_string(),
            reason: "commission must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}
