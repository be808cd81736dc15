//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow), wherever both are defined
//! Signal Line = EMA(signal) of the contiguous defined run of the MACD line,
//! re-aligned to the original indices
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9

use super::{calculate_ema, finite, map_defined_prefix, Series};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

pub fn calculate_macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdOutput {
    let ema_fast = calculate_ema(values, fast);
    let ema_slow = calculate_ema(values, slow);

    let macd: Series = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => finite(f - s),
            _ => None,
        })
        .collect();

    let signal = map_defined_prefix(&macd, |run| calculate_ema(run, signal_period));

    let histogram = macd
        .iter()
        .zip(&signal)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => finite(m - s),
            _ => None,
        })
        .collect();

    MacdOutput {
        macd,
        signal,
        histogram,
    }
}

pub fn calculate_macd_default(values: &[f64]) -> MacdOutput {
    calculate_macd(values, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
