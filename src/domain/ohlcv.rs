//! OHLCV bar representation.

use serde::{Deserialize, Serialize};

/// One OHLCV record. Timestamps are strictly increasing across a series;
/// `high >= max(open, close, low)` and `low <= min(open, close, high)` are
/// the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Range of this bar widened to include the gap from `prev_close`.
    /// NaN when any input is non-finite.
    pub fn true_range(&self, prev_close: f64) -> f64 {
        if !(self.high.is_finite() && self.low.is_finite() && prev_close.is_finite()) {
            return f64::NAN;
        }
        let span = self.high - self.low;
        let gap_up = (self.high - prev_close).abs();
        let gap_down = (self.low - prev_close).abs();
        span.max(gap_up).max(gap_down)
    }
}

/// Timestamp + close projection used for chart previews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: i64,
    pub close: f64,
}

pub fn preview(bars: &[Bar]) -> Vec<PricePoint> {
    bars.iter()
        .map(|b| PricePoint {
            timestamp: b.timestamp,
            close: b.close,
        })
        .collect()
}

/// Closing prices in bar order.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
