//! Order trigger rules against a completed bar.
//!
//! | kind       | triggers when   | fill price         |
//! |------------|-----------------|--------------------|
//! | market     | always          | open               |
//! | buy stop   | high >= price   | max(open, price)   |
//! | sell stop  | low  <= price   | min(open, price)   |
//! | buy limit  | low  <= price   | min(open, price)   |
//! | sell limit | high >= price   | max(open, price)   |
//!
//! A bar that gaps through the trigger fills at the open: worse than the
//! trigger for stops, better than the limit for limits.

use crate::types::{OrderKind, Side};

/// OHLC of the bar an order is matched against (micros).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarPrices {
    pub open: i64,
    pub high: i64,
    pub low: i64,
    pub close: i64,
}

/// Returns the execution price if the order triggers on this bar.
pub fn trigger_price(kind: &OrderKind, side: Side, bar: &BarPrices) -> Option<i64> {
    match (kind, side) {
        (OrderKind::Market, _) => Some(bar.open),
        (OrderKind::Stop { price_micros }, Side::Buy) => {
            (bar.high >= *price_micros).then(|| bar.open.max(*price_micros))
        }
        (OrderKind::Stop { price_micros }, Side::Sell) => {
            (bar.low <= *price_micros).then(|| bar.open.min(*price_micros))
        }
        (OrderKind::Limit { price_micros }, Side::Buy) => {
            (bar.low <= *price_micros).then(|| bar.open.min(*price_micros))
        }
        (OrderKind::Limit { price_micros }, Side::Sell) => {
            (bar.high >= *price_micros).then(|| bar.open.max(*price_micros))
        }
    }
}

/// Worsen a price by `slippage_bps`: BUY up, SELL down (never below zero).
pub fn apply_slippage(price_micros: i64, side: Side, slippage_bps: i64) -> i64 {
    if slippage_bps == 0 {
        return price_micros;
    }
    let adjustment = (price_micros as i128 * slippage_bps as i128) / 10_000i128;
    match side {
        Side::Buy => (price_micros as i128 + adjustment).min(i64::MAX as i128) as i64,
        Side::Sell => (price_micros as i128 - adjustment).max(0) as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const M: i64 = 1_000_000;

    fn bar(open: i64, high: i64, low: i64, close: i64) -> BarPrices {
        BarPrices {
            open: open * M,
            high: high * M,
            low: low * M,
            close: close * M,
        }
    }

    #[test]
    fn market_fills_at_open() {
        let b = bar(100, 105, 95, 101);
        assert_eq!(trigger_price(&OrderKind::Market, Side::Buy, &b), Some(100 * M));
        assert_eq!(trigger_price(&OrderKind::Market, Side::Sell, &b), Some(100 * M));
    }

    #[test]
    fn sell_stop_inside_bar_fills_at_stop() {
        let b = bar(112, 113, 108, 109);
        let kind = OrderKind::Stop { price_micros: 110 * M };
        assert_eq!(trigger_price(&kind, Side::Sell, &b), Some(110 * M));
    }

    #[test]
    fn sell_stop_gap_down_fills_at_open() {
        let b = bar(107, 108, 105, 106);
        let kind = OrderKind::Stop { price_micros: 110 * M };
        assert_eq!(trigger_price(&kind, Side::Sell, &b), Some(107 * M));
    }

    #[test]
    fn sell_stop_not_reached_does_not_trigger() {
        let b = bar(115, 118, 111, 116);
        let kind = OrderKind::Stop { price_micros: 110 * M };
        assert_eq!(trigger_price(&kind, Side::Sell, &b), None);
    }

    #[test]
    fn buy_stop_gap_up_fills_at_open() {
        let b = bar(93, 95, 92, 94);
        let kind = OrderKind::Stop { price_micros: 90 * M };
        assert_eq!(trigger_price(&kind, Side::Buy, &b), Some(93 * M));
    }

    #[test]
    fn limits_fill_at_price_or_better() {
        let kind = OrderKind::Limit { price_micros: 100 * M };
        // sell limit, bar opens above the limit => better price (open)
        assert_eq!(
            trigger_price(&kind, Side::Sell, &bar(102, 104, 99, 101)),
            Some(102 * M)
        );
        // sell limit reached intrabar
        assert_eq!(
            trigger_price(&kind, Side::Sell, &bar(97, 101, 96, 99)),
            Some(100 * M)
        );
        // buy limit not reached
        assert_eq!(trigger_price(&kind, Side::Buy, &bar(103, 106, 101, 104)), None);
        // buy limit, bar opens below => open
        assert_eq!(
            trigger_price(&kind, Side::Buy, &bar(98, 99, 97, 98)),
            Some(98 * M)
        );
    }

    #[test]
    fn slippage_moves_against_the_trader() {
        assert_eq!(apply_slippage(100 * M, Side::Buy, 10), 100_100_000);
        assert_eq!(apply_slippage(100 * M, Side::Sell, 10), 99_900_000);
        assert_eq!(apply_slippage(100 * M, Side::Sell, 0), 100 * M);
    }
}
