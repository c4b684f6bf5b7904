use std::collections::BTreeMap;

use bkt_execution::Side;
use serde::Serialize;

/// A single executed fill (the accounting atom).
///
/// qty is always positive; price and fee are micros, fee >= 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Fill {
    pub ts: i64,
    pub symbol: String,
    pub side: Side,
    pub qty: i64,
    pub price_micros: i64,
    pub fee_micros: i64,
}

impl Fill {
    pub fn new<S: Into<String>>(
        ts: i64,
        symbol: S,
        side: Side,
        qty: i64,
        price_micros: i64,
        fee_micros: i64,
    ) -> Self {
        debug_assert!(qty > 0, "Fill.qty must be > 0");
        debug_assert!(price_micros >= 0, "Fill.price_micros must be >= 0");
        debug_assert!(fee_micros >= 0, "Fill.fee_micros must be >= 0");
        Self {
            ts,
            symbol: symbol.into(),
            side,
            qty,
            price_micros,
            fee_micros,
        }
    }
}

/// A FIFO lot. +qty = long lot, -qty = short lot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lot {
    pub qty_signed: i64,
    pub entry_price_micros: i64,
}

impl Lot {
    pub fn abs_qty(&self) -> i64 {
        self.qty_signed.abs()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionState {
    pub symbol: String,
    /// FIFO lots, oldest first. All lots share one direction.
    pub lots: Vec<Lot>,
}

impl PositionState {
    pub fn new<S: Into<String>>(symbol: S) -> Self {
        Self {
            symbol: symbol.into(),
            lots: Vec::new(),
        }
    }

    /// Signed position quantity (+long, -short, 0 flat).
    pub fn qty_signed(&self) -> i64 {
        self.lots.iter().map(|l| l.qty_signed).sum()
    }

    pub fn is_flat(&self) -> bool {
        self.qty_signed() == 0
    }

    /// Quantity-weighted entry price of the open lots (0 when flat).
    pub fn avg_entry_price_micros(&self) -> i64 {
        let qty: i128 = self.lots.iter().map(|l| l.abs_qty() as i128).sum();
        if qty == 0 {
            return 0;
        }
        let notional: i128 = self
            .lots
            .iter()
            .map(|l| l.abs_qty() as i128 * l.entry_price_micros as i128)
            .sum();
        (notional / qty) as i64
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortfolioState {
    pub initial_cash_micros: i64,
    pub cash_micros: i64,
    pub realized_pnl_micros: i64,
    pub fees_paid_micros: i64,
    /// Flat positions are dropped.
    pub positions: BTreeMap<String, PositionState>,
}

impl PortfolioState {
    pub fn new(initial_cash_micros: i64) -> Self {
        Self {
            initial_cash_micros,
            cash_micros: initial_cash_micros,
            realized_pnl_micros: 0,
            fees_paid_micros: 0,
            positions: BTreeMap::new(),
        }
    }

    pub fn position_qty(&self, symbol: &str) -> i64 {
        self.positions
            .get(symbol)
            .map(|p| p.qty_signed())
            .unwrap_or(0)
    }

    pub fn position(&self, symbol: &str) -> Option<&PositionState> {
        self.positions.get(symbol)
    }
}
