use bkt_execution::{micros_to_price, BarPrices, Order, StrategyOutput};
use bkt_portfolio::ClosedTrade;
use serde::{Deserialize, Serialize};

use crate::JournalEntry;

/// One OHLCV bar. Prices in integer micros, `ts` in epoch seconds (UTC).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub ts: i64,
    pub open_micros: i64,
    pub high_micros: i64,
    pub low_micros: i64,
    pub close_micros: i64,
    pub volume: i64,
}

impl Bar {
    pub fn new<S: Into<String>>(
        symbol: S,
        ts: i64,
        open_micros: i64,
        high_micros: i64,
        low_micros: i64,
        close_micros: i64,
        volume: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            ts,
            open_micros,
            high_micros,
            low_micros,
            close_micros,
            volume,
        }
    }

    pub fn prices(&self) -> BarPrices {
        BarPrices {
            open: self.open_micros,
            high: self.high_micros,
            low: self.low_micros,
            close: self.close_micros,
        }
    }

    /// Close as f64, for indicator input.
    pub fn close(&self) -> f64 {
        micros_to_price(self.close_micros)
    }
}

/// Strategy identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategySpec {
    pub name: String,
}

impl StrategySpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Read-only position snapshot handed to strategies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionView {
    /// Signed: > 0 long, < 0 short, 0 flat.
    pub qty: i64,
    pub avg_entry_price_micros: i64,
}

/// Context passed to strategies.
/// No IO handles; the engine applies everything the strategy returns.
#[derive(Clone, Debug)]
pub struct StrategyContext<'a> {
    /// 1-based count of bars delivered so far.
    pub bar_index: u64,
    pub bar: &'a Bar,
    pub position: PositionView,
    /// Orders still open at the time of the call, ascending id.
    pub open_orders: &'a [Order],
}

/// Named indicator reading published for charting.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotValue {
    pub name: &'static str,
    pub value: f64,
}

impl PlotValue {
    pub fn new(name: &'static str, value: f64) -> Self {
        Self { name, value }
    }
}

/// Result of one bar evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrategyBarResult {
    pub output: StrategyOutput,
    pub journal: Vec<JournalEntry>,
    pub plots: Vec<PlotValue>,
}

impl StrategyBarResult {
    pub fn idle() -> Self {
        Self::default()
    }
}

pub trait Strategy: Send {
    fn spec(&self) -> StrategySpec;

    fn on_bar(&mut self, ctx: &StrategyContext<'_>) -> StrategyBarResult;

    /// Called once per round trip that went flat during fill processing.
    fn on_trade_closed(&mut self, _trade: &ClosedTrade) -> Vec<JournalEntry> {
        Vec::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StrategyHostError {
    #[error("only one strategy may be registered per engine")]
    MultiStrategyNotAllowed,
    #[error("no strategy registered")]
    NoStrategyRegistered,
}
