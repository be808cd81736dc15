//! Account state and equity tracking.

use serde::{Deserialize, Serialize};

use super::position::Trade;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: i64,
    pub price: f64,
    pub balance: f64,
}

/// Single-instrument account: either all cash (`FLAT`) or fully invested in
/// one open trade (`LONG`).
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub balance: f64,
    pub initial_balance: f64,
    pub open_trade: Option<Trade>,
    pub closed_trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Account {
    pub fn new(initial_balance: f64) -> Self {
        Account {
            balance: initial_balance,
            initial_balance,
            open_trade: None,
            closed_trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn is_long(&self) -> bool {
        self.open_trade.is_some()
    }

    /// Position value at `price` when long, otherwise the cash balance.
    pub fn equity(&self, price: f64) -> f64 {
        match &self.open_trade {
            Some(trade) => trade.market_value(price),
            None => self.balance,
        }
    }

    pub fn record_trade(&mut self, trade: Trade) {
        self.closed_trades.push(trade);
    }

    /// Append an equity point valued at `close` and return the equity.
    pub fn record_equity(&mut self, timestamp: i64, close: f64) -> f64 {
        let balance = self.equity(close);
        self.equity_curve.push(EquityPoint {
            timestamp,
            price: close,
            balance,
        });
        balance
    }
}
