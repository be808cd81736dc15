//! Fill simulation.
//!
//! Entries invest the whole balance net of commission at the fill price;
//! exits sell the whole position and pay commission on the gross proceeds.
//! A fill at a non-finite or non-positive price is skipped.

use super::portfolio::Account;
use super::position::Trade;

/// Commission charged on `trade_value` at a fractional `rate`.
pub fn calculate_commission(trade_value: f64, rate: f64) -> f64 {
    trade_value * rate
}

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered {
        quantity: f64,
        execution_price: f64,
        commission: f64,
    },
    Skipped,
}

/// Open a long position with the whole balance.
///
/// 1. Deduct commission from capital: net = balance * (1 - rate)
/// 2. quantity = net / price
/// 3. If quantity is not a positive finite number, stay flat
/// 4. Record the open trade and zero the balance
pub fn enter_long(
    account: &mut Account,
    timestamp: i64,
    market_price: f64,
    commission_rate: f64,
) -> EntryResult {
    if account.is_long() || !is_fillable(market_price) {
        return EntryResult::Skipped;
    }

    let commission = calculate_commission(account.balance, commission_rate);
    let net_capital = account.balance - commission;
    let quantity = net_capital / market_price;

    if !quantity.is_finite() || quantity <= 0.0 {
        return EntryResult::Skipped;
    }

    account.open_trade = Some(Trade::open(timestamp, market_price, quantity));
    account.balance = 0.0;

    EntryResult::Entered {
        quantity,
        execution_price: market_price,
        commission,
    }
}

/// Result of an exit.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitResult {
    pub exit_price: f64,
    pub gross_value: f64,
    pub commission: f64,
    pub profit: f64,
}

/// Close the open position.
///
/// 1. gross = quantity * price
/// 2. balance = gross - gross * rate
/// 3. profit = balance - entry_price * quantity
/// 4. Move the trade to the closed list
///
/// Returns `None` when flat or when the price can not be filled; the
/// position stays open in that case.
pub fn exit_position(
    account: &mut Account,
    timestamp: i64,
    market_price: f64,
    commission_rate: f64,
) -> Option<ExitResult> {
    if !is_fillable(market_price) {
        return None;
    }
    let mut trade = account.open_trade.take()?;

    let gross_value = trade.market_value(market_price);
    let commission = calculate_commission(gross_value, commission_rate);
    let proceeds = gross_value - commission;

    trade.close(timestamp, market_price, proceeds);
    let profit = trade.profit.unwrap_or(proceeds - trade.cost_basis());

    account.balance = proceeds;
    account.record_trade(trade);

    Some(ExitResult {
        exit_price: market_price,
        gross_value,
        commission,
        profit,
    })
}

fn is_fillable(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn commission_is_fractional() {
        assert_relative_eq!(calculate_commission(10_000.0, 0.001), 10.0);
        assert_relative_eq!(calculate_commission(10_000.0, 0.0), 0.0);
    }

    #[test]
    fn enter_long_without_commission() {
        let mut account = Account::new(10_500.0);
        let result = enter_long(&mut account, 2, 105.0, 0.0);

        assert_eq!(
            result,
            EntryResult::Entered {
                quantity: 100.0,
                execution_price: 105.0,
                commission: 0.0
            }
        );
        assert_relative_eq!(account.balance, 0.0);
        let trade = account.open_trade.as_ref().unwrap();
        assert_eq!(trade.entry_timestamp, 2);
        assert_relative_eq!(trade.quantity, 100.0);
    }

    #[test]
    fn enter_long_deducts_commission_from_capital() {
        let mut account = Account::new(10_000.0);
        let result = enter_long(&mut account, 1, 100.0, 0.01);

        match result {
            EntryResult::Entered {
                quantity,
                commission,
                ..
            } => {
                assert_relative_eq!(commission, 100.0);
                assert_relative_eq!(quantity, 99.0);
            }
            EntryResult::Skipped => panic!("expected entry"),
        }
    }

    #[test]
    fn enter_long_skips_bad_prices() {
        for price in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let mut account = Account::new(10_000.0);
            assert_eq!(enter_long(&mut account, 1, price, 0.0), EntryResult::Skipped);
            assert!(!account.is_long());
            assert_relative_eq!(account.balance, 10_000.0);
        }
    }

    #[test]
    fn enter_long_skips_empty_balance() {
        let mut account = Account::new(0.0);
        assert_eq!(enter_long(&mut account, 1, 100.0, 0.0), EntryResult::Skipped);
        assert!(!account.is_long());
    }

    #[test]
    fn enter_long_skips_when_already_long() {
        let mut account = Account::new(10_000.0);
        enter_long(&mut account, 1, 100.0, 0.0);
        assert_eq!(enter_long(&mut account, 2, 100.0, 0.0), EntryResult::Skipped);
    }

    #[test]
    fn exit_position_closes_trade() {
        let mut account = Account::new(10_500.0);
        enter_long(&mut account, 2, 105.0, 0.0);

        let result = exit_position(&mut account, 4, 115.0, 0.0).unwrap();
        assert_relative_eq!(result.gross_value, 11_500.0);
        assert_relative_eq!(result.profit, 1_000.0);
        assert_relative_eq!(account.balance, 11_500.0);
        assert!(!account.is_long());
        assert_eq!(account.closed_trades.len(), 1);
        assert_eq!(account.closed_trades[0].exit_timestamp, Some(4));
    }

    #[test]
    fn exit_commission_reduces_profit() {
        let mut account = Account::new(10_000.0);
        enter_long(&mut account, 1, 100.0, 0.001);
        let quantity = account.open_trade.as_ref().unwrap().quantity;

        let result = exit_position(&mut account, 2, 110.0, 0.001).unwrap();
        let gross = quantity * 110.0;
        assert_relative_eq!(result.commission, gross * 0.001);
        assert_relative_eq!(account.balance, gross * 0.999);
        assert_relative_eq!(result.profit, gross * 0.999 - quantity * 100.0);
    }

    #[test]
    fn exit_position_when_flat() {
        let mut account = Account::new(10_000.0);
        assert!(exit_position(&mut account, 1, 100.0, 0.0).is_none());
    }

    #[test]
    fn exit_position_bad_price_keeps_position() {
        let mut account = Account::new(10_000.0);
        enter_long(&mut account, 1, 100.0, 0.0);

        assert!(exit_position(&mut account, 2, f64::NAN, 0.0).is_none());
        assert!(account.is_long());
        assert!(account.closed_trades.is_empty());
    }
}
