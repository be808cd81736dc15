//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the population standard deviation, taken incrementally from a
//! running sum and sum of squares: variance = E[x²] - E[x]², clamped at zero.
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) values are undefined.

use super::{finite, Series};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT_X100: u32 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

pub fn calculate_bollinger(values: &[f64], period: usize, mult: f64) -> BollingerBands {
    let len = values.len();
    let mut bands = BollingerBands {
        upper: Vec::with_capacity(len),
        middle: Vec::with_capacity(len),
        lower: Vec::with_capacity(len),
    };

    if period == 0 {
        bands.upper = vec![None; len];
        bands.middle = vec![None; len];
        bands.lower = vec![None; len];
        return bands;
    }

    let n = period as f64;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut non_finite = 0usize;

    for (i, &value) in values.iter().enumerate() {
        if value.is_finite() {
            sum += value;
            sum_sq += value * value;
        } else {
            non_finite += 1;
        }

        if i >= period {
            let dropped = values[i - period];
            if dropped.is_finite() {
                sum -= dropped;
                sum_sq -= dropped * dropped;
            } else {
                non_finite -= 1;
            }
        }

        if i + 1 < period || non_finite > 0 {
            bands.upper.push(None);
            bands.middle.push(None);
            bands.lower.push(None);
            continue;
        }

        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);
        let stddev = variance.sqrt();

        bands.middle.push(finite(mean));
        bands.upper.push(finite(mean + mult * stddev));
        bands.lower.push(finite(mean - mult * stddev));
    }

    bands
}
