//! Stochastic oscillator.
//!
//! Raw %K = 100 * (close - lowest low) / (highest high - lowest low) over a
//! trailing `period` window, 50 when the range is zero.
//! Smoothed %K = SMA(k_smooth) of raw %K; %D = SMA(d_period) of smoothed %K.
//! Both smoothings run over the defined run and are re-aligned to the bars.
//! Raw %K is undefined while the window holds a non-finite high or low.

use std::collections::VecDeque;

use super::{calculate_sma, finite, map_defined_prefix, Series};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_PERIOD: usize = 14;
pub const DEFAULT_K_SMOOTH: usize = 3;
pub const DEFAULT_D_PERIOD: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticOutput {
    pub k: Series,
    pub d: Series,
}

pub fn calculate_stochastic(
    bars: &[Bar],
    period: usize,
    k_smooth: usize,
    d_period: usize,
) -> StochasticOutput {
    let raw_k = raw_percent_k(bars, period);
    let k = map_defined_prefix(&raw_k, |run| calculate_sma(run, k_smooth));
    let d = map_defined_prefix(&k, |run| calculate_sma(run, d_period));
    StochasticOutput { k, d }
}

fn raw_percent_k(bars: &[Bar], period: usize) -> Series {
    let mut out = vec![None; bars.len()];
    if period == 0 {
        return out;
    }

    // Indices with decreasing highs / increasing lows; the front is the
    // window extreme.
    let mut highs: VecDeque<usize> = VecDeque::with_capacity(period);
    let mut lows: VecDeque<usize> = VecDeque::with_capacity(period);
    let mut non_finite = 0usize;

    for (i, bar) in bars.iter().enumerate() {
        if i >= period && !has_finite_range(&bars[i - period]) {
            non_finite -= 1;
        }
        if !has_finite_range(bar) {
            non_finite += 1;
            continue;
        }

        while highs.back().is_some_and(|&j| bars[j].high <= bar.high) {
            highs.pop_back();
        }
        highs.push_back(i);
        while lows.back().is_some_and(|&j| bars[j].low >= bar.low) {
            lows.pop_back();
        }
        lows.push_back(i);

        if i + 1 < period || non_finite > 0 {
            continue;
        }

        let window_start = i + 1 - period;
        while highs.front().is_some_and(|&j| j < window_start) {
            highs.pop_front();
        }
        while lows.front().is_some_and(|&j| j < window_start) {
            lows.pop_front();
        }

        let (Some(&hi), Some(&lo)) = (highs.front(), lows.front()) else {
            continue;
        };
        let max_high = bars[hi].high;
        let min_low = bars[lo].low;
        let range = max_high - min_low;

        out[i] = if range == 0.0 {
            Some(50.0)
        } else {
            finite(100.0 * (bar.close - min_low) / range)
        };
    }

    out
}

fn has_finite_range(bar: &Bar) -> bool {
    bar.high.is_finite() && bar.low.is_finite()
}
