#![allow(dead_code)]

use backtester::domain::backtest::BacktestConfig;
use backtester::domain::error::BacktestError;
pub use backtester::domain::ohlcv::Bar;
use backtester::domain::rule::{ComparisonOperator, Rule};
use backtester::domain::strategy::StrategyRules;
use backtester::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, source: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(source.to_string(), bars);
        self
    }

    pub fn with_error(mut self, source: &str, reason: &str) -> Self {
        self.errors.insert(source.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, source: &str) -> Result<Vec<Bar>, BacktestError> {
        if let Some(reason) = self.errors.get(source) {
            return Err(BacktestError::DataRead {
                path: source.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(source).cloned().unwrap_or_default())
    }
}

pub fn make_bar(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
    Bar {
        timestamp,
        open,
        high,
        low,
        close,
        volume: 1000.0,
    }
}

/// Bars whose open equals the previous close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            make_bar(
                i as i64 + 1,
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
            )
        })
        .collect()
}

/// Five rising bars: fills at 105 and 115, then re-entry at 120.
pub fn scenario_a_bars() -> Vec<Bar> {
    vec![
        make_bar(1, 100.0, 110.0, 90.0, 105.0),
        make_bar(2, 105.0, 115.0, 95.0, 110.0),
        make_bar(3, 110.0, 120.0, 100.0, 115.0),
        make_bar(4, 115.0, 125.0, 105.0, 120.0),
        make_bar(5, 120.0, 130.0, 110.0, 125.0),
    ]
}

pub fn scenario_a_rules() -> StrategyRules {
    StrategyRules::new(
        Rule::comparison("close", ComparisonOperator::Gt, 100.0),
        Rule::comparison("close", ComparisonOperator::Gt, 112.0),
    )
}

pub fn sma_crossover_rules() -> StrategyRules {
    StrategyRules::new(
        Rule::comparison("close", ComparisonOperator::Gt, "sma_5"),
        Rule::comparison("close", ComparisonOperator::Lt, "sma_5"),
    )
}

pub fn zero_commission(initial_balance: f64) -> BacktestConfig {
    BacktestConfig {
        initial_balance,
        commission: 0.0,
    }
}

/// Deterministic zig-zag around an upward drift.
pub fn wave_closes(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let x = i as f64;
            100.0 + x * 0.3 + (x * 0.7).sin() * 8.0
        })
        .collect()
}

pub const SCENARIO_A_RULES_JSON: &str = r#"{
  "entry": {"type": "comparison", "left": "close", "operator": ">", "right": 100},
  "exit": {"type": "comparison", "left": "close", "operator": ">", "right": 112}
}"#;

pub const SCENARIO_A_CSV: &str = "timestamp,open,high,low,close,volume
1,100,110,90,105,1000
2,105,115,95,110,1000
3,110,120,100,115,1000
4,115,125,105,120,1000
5,120,130,110,125,1000
";
