//! Round-trip trade tracking.
//!
//! A trade opens when a symbol leaves flat and closes when it returns to
//! flat. A fill that reverses the position closes the current trade and
//! opens a new one in the other direction; its fee is charged to the trade
//! being closed.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::Fill;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClosedTrade {
    /// Monotonic trade reference, starting at 1.
    pub trade_ref: u64,
    pub symbol: String,
    pub opened_ts: i64,
    pub closed_ts: i64,
    /// Bar index (1-based) of the closing fill.
    pub bar_index: u64,
    /// Realized PnL of the round trip, fees excluded.
    pub pnl_micros: i64,
    /// Realized PnL net of all fees paid on the round trip.
    pub pnl_net_micros: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct OpenTrade {
    trade_ref: u64,
    opened_ts: i64,
    pnl_micros: i64,
    fees_micros: i64,
}

#[derive(Clone, Debug, Default)]
pub struct TradeTracker {
    next_ref: u64,
    open: BTreeMap<String, OpenTrade>,
}

impl TradeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_trade_ref(&self, symbol: &str) -> Option<u64> {
        self.open.get(symbol).map(|t| t.trade_ref)
    }

    /// Record a fill given the position quantity before and after it and the
    /// realized PnL it produced. Returns the trade it closed, if any.
    pub fn on_fill(
        &mut self,
        fill: &Fill,
        qty_before: i64,
        qty_after: i64,
        realized_micros: i64,
        bar_index: u64,
    ) -> Option<ClosedTrade> {
        if qty_before == 0 {
            debug_assert_eq!(realized_micros, 0);
            self.open_new(fill, fill.fee_micros);
            return None;
        }

        let trade = self.open.get_mut(&fill.symbol)?;
        trade.pnl_micros = trade.pnl_micros.saturating_add(realized_micros);
        trade.fees_micros = trade.fees_micros.saturating_add(fill.fee_micros);

        let reversed = qty_after != 0 && qty_after.signum() != qty_before.signum();
        if qty_after != 0 && !reversed {
            return None;
        }

        let trade = self.open.remove(&fill.symbol)?;
        let closed = ClosedTrade {
            trade_ref: trade.trade_ref,
            symbol: fill.symbol.clone(),
            opened_ts: trade.opened_ts,
            closed_ts: fill.ts,
            bar_index,
            pnl_micros: trade.pnl_micros,
            pnl_net_micros: trade.pnl_micros.saturating_sub(trade.fees_micros),
        };

        if reversed {
            self.open_new(fill, 0);
        }
        Some(closed)
    }

    fn open_new(&mut self, fill: &Fill, fees_micros: i64) {
        self.next_ref += 1;
        self.open.insert(
            fill.symbol.clone(),
            OpenTrade {
                trade_ref: self.next_ref,
                opened_ts: fill.ts,
                pnl_micros: 0,
                fees_micros,
            },
        );
    }
}
