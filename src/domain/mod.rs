//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod enrich;
pub mod rule;
pub mod rule_eval;
pub mod strategy;
pub mod position;
pub mod portfolio;
pub mod execution;
pub mod metrics;
pub mod backtest;
pub mod history;
pub mod config_validation;
pub mod error;
