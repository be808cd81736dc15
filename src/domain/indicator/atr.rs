//! Average True Range indicator.
//!
//! TR[0] = high - low; TR[i] = max(high-low, |high-prevClose|, |low-prevClose|).
//! Seed ATR at index n-1 as the mean of TR[0..n], then Wilder smoothing
//! ATR[i] = (ATR[i-1] * (n-1) + TR[i]) / n.
//! A non-finite high, low or close makes its TR NaN, which carries through the
//! smoothing and leaves every later value undefined.

use super::{finite, Series};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(bars: &[Bar], period: usize) -> Series {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return out;
    }

    let n = period as f64;
    let mut tr_sum = 0.0;
    let mut atr = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        let tr = if i == 0 {
            bar.high - bar.low
        } else {
            bar.true_range(bars[i - 1].close)
        };

        if i < period - 1 {
            tr_sum += tr;
        } else if i == period - 1 {
            tr_sum += tr;
            atr = tr_sum / n;
            out[i] = finite(atr);
        } else {
            atr = (atr * (n - 1.0) + tr) / n;
            out[i] = finite(atr);
        }
    }

    out
}
