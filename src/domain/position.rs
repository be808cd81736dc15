//! Trade records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

/// A long round trip. Created on an entry fill, closed once on an exit fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub entry_timestamp: i64,
    pub entry_price: f64,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_percentage: Option<f64>,
    pub status: TradeStatus,
}

impl Trade {
    pub fn open(entry_timestamp: i64, entry_price: f64, quantity: f64) -> Self {
        Trade {
            entry_timestamp,
            entry_price,
            quantity,
            exit_timestamp: None,
            exit_price: None,
            profit: None,
            profit_percentage: None,
            status: TradeStatus::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    /// Entry price times quantity. Excludes the entry commission, which was
    /// taken from capital before sizing.
    pub fn cost_basis(&self) -> f64 {
        self.entry_price * self.quantity
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity * price
    }

    /// Mark the trade closed given the net proceeds of the exit fill.
    pub fn close(&mut self, exit_timestamp: i64, exit_price: f64, proceeds: f64) {
        let cost = self.cost_basis();
        let profit = proceeds - cost;
        self.exit_timestamp = Some(exit_timestamp);
        self.exit_price = Some(exit_price);
        self.profit = Some(profit);
        self.profit_percentage = Some(profit / cost * 100.0);
        self.status = TradeStatus::Closed;
    }
}
