//! Bar enrichment.
//!
//! Merges each bar's raw fields with the indicator values computed over the
//! whole series into a [`Snapshot`]: a string-keyed map the rule engine reads.
//! Indicator fields are absent while the indicator is warming up, and
//! non-finite values are never stored.

use std::collections::{HashMap, HashSet};

use crate::domain::indicator::{
    calculate_atr, calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi,
    calculate_sma, calculate_stochastic, default_indicators, IndicatorType, Series,
};
use crate::domain::ohlcv::{closes, Bar};
use crate::domain::strategy::StrategyRules;

/// Field names every snapshot carries (unless the raw value is non-finite).
pub const RAW_FIELDS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    fields: HashMap<String, f64>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bar(bar: &Bar) -> Self {
        let mut snapshot = Self::new();
        snapshot.insert("timestamp", bar.timestamp as f64);
        snapshot.insert("open", bar.open);
        snapshot.insert("high", bar.high);
        snapshot.insert("low", bar.low);
        snapshot.insert("close", bar.close);
        snapshot.insert("volume", bar.volume);
        snapshot
    }

    /// Store `value` under `name`; non-finite values are dropped.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        if value.is_finite() {
            self.fields.insert(name.into(), value);
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (name, value) in iter {
            snapshot.insert(name, value);
        }
        snapshot
    }
}

/// Named output series for one indicator, in `field_names()` order.
pub fn compute_fields(indicator: &IndicatorType, bars: &[Bar]) -> Vec<(String, Series)> {
    let names = indicator.field_names();
    let series: Vec<Series> = match indicator {
        IndicatorType::Sma(period) => vec![calculate_sma(&closes(bars), *period)],
        IndicatorType::Ema(period) => vec![calculate_ema(&closes(bars), *period)],
        IndicatorType::Rsi(period) => vec![calculate_rsi(&closes(bars), *period)],
        IndicatorType::Atr(period) => vec![calculate_atr(bars, *period)],
        IndicatorType::Macd { fast, slow, signal } => {
            let out = calculate_macd(&closes(bars), *fast, *slow, *signal);
            vec![out.macd, out.signal, out.histogram]
        }
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        } => {
            let mult = *stddev_mult_x100 as f64 / 100.0;
            let out = calculate_bollinger(&closes(bars), *period, mult);
            vec![out.upper, out.middle, out.lower]
        }
        IndicatorType::Stochastic {
            period,
            k_smooth,
            d_period,
        } => {
            let out = calculate_stochastic(bars, *period, *k_smooth, *d_period);
            vec![out.k, out.d]
        }
    };
    names.into_iter().zip(series).collect()
}

/// One snapshot per bar, carrying the raw fields and every defined value of
/// the requested indicators. Duplicate indicators are computed once.
pub fn enrich(bars: &[Bar], indicators: &[IndicatorType]) -> Vec<Snapshot> {
    let mut snapshots: Vec<Snapshot> = bars.iter().map(Snapshot::from_bar).collect();

    let mut seen = HashSet::new();
    for indicator in indicators {
        if !seen.insert(indicator) {
            continue;
        }
        for (name, series) in compute_fields(indicator, bars) {
            for (snapshot, value) in snapshots.iter_mut().zip(series) {
                if let Some(value) = value {
                    snapshot.insert(name.as_str(), value);
                }
            }
        }
    }

    snapshots
}

/// The default indicator set plus every indicator a rule references by name.
pub fn indicators_for_rules(rules: &StrategyRules) -> Vec<IndicatorType> {
    let mut indicators = default_indicators();
    for name in rules.field_names() {
        if let Some(indicator) = IndicatorType::from_field_name(&name) {
            if !indicators.contains(&indicator) {
                indicators.push(indicator);
            }
        }
    }
    indicators
}

/// Referenced fields that no snapshot could ever contain.
pub fn unresolvable_fields(rules: &StrategyRules) -> Vec<String> {
    rules
        .field_names()
        .into_iter()
        .filter(|name| {
            !RAW_FIELDS.contains(&name.as_str()) && IndicatorType::from_field_name(name).is_none()
        })
        .collect()
}
