//! RSI (Relative Strength Index) indicator.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of the first n gains/losses
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n values are undefined (n price changes are needed to seed).
//! A non-finite price poisons both averages, so every later value is undefined.

use super::{finite, Series};

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(values: &[f64], period: usize) -> Series {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    let n = period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..=period {
        let (gain, loss) = gain_loss(values[i] - values[i - 1]);
        avg_gain += gain;
        avg_loss += loss;
    }
    avg_gain /= n;
    avg_loss /= n;
    out[period] = finite(rsi_value(avg_gain, avg_loss));

    for i in (period + 1)..values.len() {
        let (gain, loss) = gain_loss(values[i] - values[i - 1]);
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        out[i] = finite(rsi_value(avg_gain, avg_loss));
    }

    out
}

fn gain_loss(change: f64) -> (f64, f64) {
    if !change.is_finite() {
        return (f64::NAN, f64::NAN);
    }
    let gain = if change > 0.0 { change } else { 0.0 };
    let loss = if change < 0.0 { -change } else { 0.0 };
    (gain, loss)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
