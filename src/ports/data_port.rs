//! Bar data access port trait.

use crate::domain::error::BacktestError;
use crate::domain::ohlcv::Bar;

pub trait DataPort {
    /// Bars from `source` in ascending timestamp order. An empty source
    /// yields an empty vec; an unreadable one is an error.
    fn fetch_bars(&self, source: &str) -> Result<Vec<Bar>, BacktestError>;
}
