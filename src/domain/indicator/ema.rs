//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with the SMA of the first n values, then
//! EMA[i] = (v[i] - EMA[i-1]) * k + EMA[i-1].
//! Warmup: first (n-1) values are undefined.

use super::{finite, Series};

pub fn calculate_ema(values: &[f64], period: usize) -> Series {
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, &value) in values.iter().enumerate() {
        if i < period - 1 {
            sum += value;
            out.push(None);
        } else if i == period - 1 {
            sum += value;
            ema = sum / period as f64;
            out.push(finite(ema));
        } else {
            ema = (value - ema) * k + ema;
            out.push(finite(ema));
        }
    }

    out
}
