use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Sign applied to a positive quantity: +1 for buys, -1 for sells.
    pub fn sign(self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Execution type of an order.
///
/// `Stop` and `Limit` carry their trigger price in integer micros.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OrderKind {
    Market,
    Stop { price_micros: i64 },
    Limit { price_micros: i64 },
}

impl OrderKind {
    pub fn price_micros(&self) -> Option<i64> {
        match self {
            OrderKind::Market => None,
            OrderKind::Stop { price_micros } | OrderKind::Limit { price_micros } => {
                Some(*price_micros)
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderKind::Market => "market",
            OrderKind::Stop { .. } => "stop",
            OrderKind::Limit { .. } => "limit",
        }
    }
}

/// Monotonic order identifier assigned by the [`crate::OrderBook`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a strategy asks for. Quantity is always positive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: Side,
    pub kind: OrderKind,
    pub qty: i64,
}

impl OrderIntent {
    pub fn new<S: Into<String>>(symbol: S, side: Side, kind: OrderKind, qty: i64) -> Self {
        debug_assert!(qty > 0, "OrderIntent.qty must be > 0");
        Self {
            symbol: symbol.into(),
            side,
            kind,
            qty,
        }
    }

    pub fn market<S: Into<String>>(symbol: S, side: Side, qty: i64) -> Self {
        Self::new(symbol, side, OrderKind::Market, qty)
    }

    pub fn stop<S: Into<String>>(symbol: S, side: Side, price_micros: i64, qty: i64) -> Self {
        Self::new(symbol, side, OrderKind::Stop { price_micros }, qty)
    }

    pub fn limit<S: Into<String>>(symbol: S, side: Side, price_micros: i64, qty: i64) -> Self {
        Self::new(symbol, side, OrderKind::Limit { price_micros }, qty)
    }
}

/// Strategy output for one bar: cancels are applied before new orders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrategyOutput {
    pub cancels: Vec<OrderId>,
    pub orders: Vec<OrderIntent>,
}

impl StrategyOutput {
    pub fn new(cancels: Vec<OrderId>, orders: Vec<OrderIntent>) -> Self {
        Self { cancels, orders }
    }

    pub fn is_empty(&self) -> bool {
        self.cancels.is_empty() && self.orders.is_empty()
    }
}
