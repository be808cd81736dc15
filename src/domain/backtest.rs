//! Backtest engine and event loop.
//!
//! One pass over the bars: evaluate the entry or exit rule on bar `i`'s
//! snapshot, fill at bar `i + 1`'s open, record equity at bar `i`'s close.
//! A signal on the last bar has no fill and is ignored.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::enrich::{enrich, indicators_for_rules, Snapshot};
use super::execution::{enter_long, exit_position, EntryResult};
use super::metrics::{DrawdownTracker, Stats};
use super::ohlcv::Bar;
use super::portfolio::{Account, EquityPoint};
use super::position::Trade;
use super::rule_eval::evaluate;
use super::strategy::StrategyRules;

pub const DEFAULT_INITIAL_BALANCE: f64 = 10_000.0;
pub const DEFAULT_COMMISSION: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestConfig {
    pub initial_balance: f64,
    /// Fraction of traded value, in [0, 1].
    pub commission: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            commission: DEFAULT_COMMISSION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    pub stats: Stats,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_trade: Option<Trade>,
}

/// Enrich `bars` with every indicator the rules need and simulate.
pub fn run_backtest(bars: &[Bar], rules: &StrategyRules, config: &BacktestConfig) -> BacktestResult {
    let indicators = indicators_for_rules(rules);
    debug!(count = indicators.len(), "computing indicators");
    let snapshots = enrich(bars, &indicators);
    debug!(
        bars = snapshots.len(),
        fields = snapshots.first().map_or(0, Snapshot::len),
        "enriched bars"
    );
    simulate(bars, &snapshots, rules, config)
}

/// Run the FLAT/LONG state machine over pre-enriched snapshots.
/// `snapshots` must be aligned with `bars`; extra entries on either side
/// are ignored.
pub fn simulate(
    bars: &[Bar],
    snapshots: &[Snapshot],
    rules: &StrategyRules,
    config: &BacktestConfig,
) -> BacktestResult {
    let mut account = Account::new(config.initial_balance);
    let mut drawdown = DrawdownTracker::new(config.initial_balance);

    for (i, (bar, snapshot)) in bars.iter().zip(snapshots).enumerate() {
        let next = bars.get(i + 1);

        match state(&account) {
            PositionState::Flat => {
                if let Some(next) = next.filter(|_| evaluate(&rules.entry, snapshot)) {
                    match enter_long(&mut account, next.timestamp, next.open, config.commission) {
                        EntryResult::Entered {
                            quantity,
                            execution_price,
                            commission,
                        } => debug!(
                            signal = bar.timestamp,
                            fill = next.timestamp,
                            price = execution_price,
                            quantity,
                            commission,
                            "entered long"
                        ),
                        EntryResult::Skipped => debug!(
                            signal = bar.timestamp,
                            price = next.open,
                            "entry skipped"
                        ),
                    }
                }
            }
            PositionState::Long => {
                if let Some(next) = next.filter(|_| evaluate(&rules.exit, snapshot)) {
                    match exit_position(&mut account, next.timestamp, next.open, config.commission)
                    {
                        Some(exit) => debug!(
                            signal = bar.timestamp,
                            fill = next.timestamp,
                            price = exit.exit_price,
                            profit = exit.profit,
                            "exited long"
                        ),
                        None => debug!(
                            signal = bar.timestamp,
                            price = next.open,
                            "exit skipped"
                        ),
                    }
                }
            }
        }

        let equity = account.record_equity(bar.timestamp, bar.close);
        drawdown.update(equity);
    }

    let final_balance = final_balance(&account, bars);
    let stats = Stats::compute(
        config.initial_balance,
        final_balance,
        &account.closed_trades,
        drawdown.max_drawdown(),
    );

    info!(
        bars = bars.len(),
        trades = stats.total_trades,
        final_balance = stats.final_balance,
        total_profit = stats.total_profit,
        max_drawdown = stats.max_drawdown,
        peak_equity = drawdown.peak(),
        "backtest complete"
    );

    BacktestResult {
        stats,
        trades: account.closed_trades,
        equity_curve: account.equity_curve,
        open_trade: account.open_trade,
    }
}

fn state(account: &Account) -> PositionState {
    if account.is_long() {
        PositionState::Long
    } else {
        PositionState::Flat
    }
}

/// Cash balance, or the open position marked at the last finite close.
/// Valuation only, so no commission is charged.
fn final_balance(account: &Account, bars: &[Bar]) -> f64 {
    match &account.open_trade {
        Some(trade) => {
            let mark = bars
                .iter()
                .rev()
                .map(|b| b.close)
                .find(|c| c.is_finite())
                .unwrap_or(trade.entry_price);
            trade.market_value(mark)
        }
        None => account.balance,
    }
}
