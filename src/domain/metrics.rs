//! Drawdown tracking and summary statistics.

use serde::{Deserialize, Serialize};

use super::position::Trade;

/// Running peak and worst fractional decline from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownTracker {
    peak: f64,
    max_drawdown: f64,
}

impl DrawdownTracker {
    pub fn new(initial_equity: f64) -> Self {
        DrawdownTracker {
            peak: initial_equity,
            max_drawdown: 0.0,
        }
    }

    /// Fold one equity observation in and return the current drawdown.
    /// Non-finite equity leaves both the peak and the maximum unchanged.
    pub fn update(&mut self, equity: f64) -> f64 {
        self.peak = self.peak.max(equity);
        let drawdown = if self.peak > 0.0 {
            (self.peak - equity) / self.peak
        } else {
            0.0
        };
        self.max_drawdown = self.max_drawdown.max(drawdown);
        drawdown
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub final_balance: f64,
    pub total_profit: f64,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub total_trades: usize,
}

impl Stats {
    pub fn compute(
        initial_balance: f64,
        final_balance: f64,
        closed_trades: &[Trade],
        max_drawdown: f64,
    ) -> Self {
        let total_trades = closed_trades.len();
        let winners = closed_trades
            .iter()
            .filter(|t| t.profit.is_some_and(|p| p > 0.0))
            .count();

        let win_rate = if total_trades > 0 {
            winners as f64 / total_trades as f64
        } else {
            0.0
        };

        Stats {
            final_balance,
            total_profit: final_balance - initial_balance,
            win_rate,
            max_drawdown,
            total_trades,
        }
    }
}
