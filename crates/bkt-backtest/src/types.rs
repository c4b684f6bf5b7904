use std::collections::BTreeMap;

use bkt_execution::Order;
use bkt_portfolio::{ClosedTrade, Fill};
use bkt_strategy::JournalEntry;

/// Stress profile for fill pricing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StressProfile {
    /// Slippage in basis points (1 bps = 0.01%).
    /// Applied to market and stop fills: BUY higher, SELL lower. Limits are exempt.
    pub slippage_bps: i64,
}

/// Backtest configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktestConfig {
    /// Initial cash balance in micros.
    pub initial_cash_micros: i64,

    /// Commission in basis points of fill notional, charged as the fill fee.
    pub commission_bps: i64,

    pub stress: StressProfile,
}

impl BacktestConfig {
    /// Reasonable defaults for testing.
    pub fn test_defaults() -> Self {
        Self {
            initial_cash_micros: 100_000_000_000, // 100k
            commission_bps: 0,
            stress: StressProfile { slippage_bps: 0 },
        }
    }
}

/// Time series of one indicator line: (bar ts, value).
pub type PlotSeries = Vec<(i64, f64)>;

/// Backtest report produced after a run.
#[derive(Clone, Debug, PartialEq)]
pub struct BacktestReport {
    pub strategy: String,
    pub bars_processed: u64,
    pub starting_value_micros: i64,
    pub final_value_micros: i64,
    /// Equity curve: (ts, equity_micros) at each bar close.
    pub equity_curve: Vec<(i64, i64)>,
    pub fills: Vec<Fill>,
    /// Every submitted order with its final status, ascending id.
    pub orders: Vec<Order>,
    pub closed_trades: Vec<ClosedTrade>,
    pub journal: Vec<JournalEntry>,
    /// Indicator lines published by the strategy, keyed by name.
    pub plots: BTreeMap<String, PlotSeries>,
    /// Last known price per symbol.
    pub last_prices: BTreeMap<String, i64>,
    pub final_cash_micros: i64,
    pub fees_paid_micros: i64,
    pub realized_pnl_micros: i64,
}
