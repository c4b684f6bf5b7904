//! Bollinger-band mean reversion.
//!
//! Flat: a close outside the bands arms a stop entry back at the breached
//! band (sell stop at `top`, buy stop at `bot`). In position: a limit exit
//! rests at `mid`. Every evaluated bar first cancels whatever is still open,
//! so resting prices always track the current bands.

use bkt_execution::{price_to_micros, Order, OrderIntent, PricingError, Side, StrategyOutput};
use bkt_indicators::{Bands, Bollinger};
use bkt_portfolio::ClosedTrade;
use serde::{Deserialize, Serialize};

use crate::params::{require_period, require_positive, StrategyConfigError};
use crate::{
    Bar, JournalEntry, PlotValue, Strategy, StrategyBarResult, StrategyContext, StrategySpec,
};

const NAME: &str = "bollinger";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BollingerParams {
    pub period: usize,
    pub devfactor: f64,
    pub size: i64,
    pub debug: bool,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 40,
            devfactor: 2.0,
            size: 20,
            debug: false,
        }
    }
}

impl BollingerParams {
    pub fn new(
        period: usize,
        devfactor: f64,
        size: i64,
        debug: bool,
    ) -> Result<Self, StrategyConfigError> {
        let p = Self {
            period,
            devfactor,
            size,
            debug,
        };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> Result<(), StrategyConfigError> {
        require_period(NAME, "period", self.period)?;
        if !self.devfactor.is_finite() || self.devfactor <= 0.0 {
            return Err(StrategyConfigError::InvalidDevfactor {
                strategy: NAME,
                value: self.devfactor,
            });
        }
        require_positive(NAME, "size", self.size)
    }
}

/// Band triple in integer micros.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BandState {
    pub mid: i64,
    pub top: i64,
    pub bot: i64,
}

impl BandState {
    pub fn from_bands(b: &Bands) -> Result<Self, PricingError> {
        Ok(Self {
            mid: price_to_micros(b.mid)?,
            top: price_to_micros(b.top)?,
            bot: price_to_micros(b.bot)?,
        })
    }
}

/// Per-bar decision. Cancels every open order, then emits at most one new
/// order depending on position sign and where the close sits in the bands.
pub fn decide(
    params: &BollingerParams,
    bar: &Bar,
    bands: &BandState,
    position_qty: i64,
    open_orders: &[Order],
) -> StrategyOutput {
    let cancels = open_orders
        .iter()
        .filter(|o| o.is_open())
        .map(|o| o.id)
        .collect();

    let symbol = bar.symbol.as_str();
    let size = params.size;

    // top >= bot whenever devfactor > 0, so the two breakouts cannot both hold.
    let order = if position_qty == 0 {
        if bar.close_micros > bands.top {
            Some(OrderIntent::stop(symbol, Side::Sell, bands.top, size))
        } else if bar.close_micros < bands.bot {
            Some(OrderIntent::stop(symbol, Side::Buy, bands.bot, size))
        } else {
            None
        }
    } else if position_qty > 0 {
        Some(OrderIntent::limit(symbol, Side::Sell, bands.mid, size))
    } else {
        Some(OrderIntent::limit(symbol, Side::Buy, bands.mid, size))
    };

    StrategyOutput::new(cancels, order.into_iter().collect())
}

pub struct BollingerStrategy {
    params: BollingerParams,
    boll: Bollinger,
}

impl BollingerStrategy {
    pub fn new(params: BollingerParams) -> Result<Self, StrategyConfigError> {
        params.validate()?;
        let boll = Bollinger::new(params.period, params.devfactor)?;
        Ok(Self { params, boll })
    }
}

impl Strategy for BollingerStrategy {
    fn spec(&self) -> StrategySpec {
        StrategySpec::new(NAME)
    }

    fn on_bar(&mut self, ctx: &StrategyContext<'_>) -> StrategyBarResult {
        let Some(raw) = self.boll.next(ctx.bar.close()) else {
            return StrategyBarResult::idle();
        };
        let bands = match BandState::from_bands(&raw) {
            Ok(b) => b,
            Err(err) => {
                tracing::warn!(
                    bar_index = ctx.bar_index,
                    %err,
                    "bollinger: band value unusable, bar skipped"
                );
                return StrategyBarResult::idle();
            }
        };

        let output = decide(
            &self.params,
            ctx.bar,
            &bands,
            ctx.position.qty,
            ctx.open_orders,
        );

        let mut journal = Vec::new();
        if self.params.debug {
            journal.push(JournalEntry::BarSnapshot {
                data_name: ctx.bar.symbol.clone(),
                bar_index: ctx.bar_index,
                ts: ctx.bar.ts,
                open_micros: ctx.bar.open_micros,
                high_micros: ctx.bar.high_micros,
                low_micros: ctx.bar.low_micros,
                close_micros: ctx.bar.close_micros,
                volume: ctx.bar.volume,
                position_qty: ctx.position.qty,
            });
        }

        StrategyBarResult {
            output,
            journal,
            plots: vec![
                PlotValue::new("boll_mid", raw.mid),
                PlotValue::new("boll_top", raw.top),
                PlotValue::new("boll_bot", raw.bot),
            ],
        }
    }

    fn on_trade_closed(&mut self, trade: &ClosedTrade) -> Vec<JournalEntry> {
        if !self.params.debug {
            return Vec::new();
        }
        vec![JournalEntry::TradeClosed {
            data_name: trade.symbol.clone(),
            bar_index: trade.bar_index,
            ts: trade.closed_ts,
            trade_ref: trade.trade_ref,
            pnl_micros: trade.pnl_micros,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bkt_execution::{OrderId, OrderKind};

    const M: i64 = 1_000_000;

    fn bar(close: i64) -> Bar {
        Bar::new("SPY", 1_700_000_000, close * M, close * M, close * M, close * M, 1000)
    }

    fn bands() -> BandState {
        BandState {
            mid: 100 * M,
            top: 110 * M,
            bot: 90 * M,
        }
    }

    fn resting(id: u64) -> Order {
        Order::new(
            OrderId(id),
            OrderIntent::limit("SPY", Side::Sell, 100 * M, 20),
            1,
        )
    }

    #[test]
    fn flat_close_above_top_arms_sell_stop_at_top() {
        let out = decide(&BollingerParams::default(), &bar(115), &bands(), 0, &[]);
        assert_eq!(
            out.orders,
            vec![OrderIntent::stop("SPY", Side::Sell, 110 * M, 20)]
        );
    }

    #[test]
    fn flat_close_below_bot_arms_buy_stop_at_bot() {
        let out = decide(&BollingerParams::default(), &bar(85), &bands(), 0, &[]);
        assert_eq!(
            out.orders,
            vec![OrderIntent::stop("SPY", Side::Buy, 90 * M, 20)]
        );
    }

    #[test]
    fn flat_inside_bands_places_nothing() {
        let out = decide(&BollingerParams::default(), &bar(100), &bands(), 0, &[]);
        assert!(out.orders.is_empty());
        // Touching a band is not a breach.
        let out = decide(&BollingerParams::default(), &bar(110), &bands(), 0, &[]);
        assert!(out.orders.is_empty());
    }

    #[test]
    fn long_exits_with_sell_limit_at_mid() {
        let out = decide(&BollingerParams::default(), &bar(95), &bands(), 20, &[]);
        assert_eq!(
            out.orders,
            vec![OrderIntent::limit("SPY", Side::Sell, 100 * M, 20)]
        );
    }

    #[test]
    fn short_exits_with_buy_limit_at_mid() {
        let out = decide(&BollingerParams::default(), &bar(120), &bands(), -20, &[]);
        assert_eq!(out.orders.len(), 1);
        let o = &out.orders[0];
        assert_eq!(o.side, Side::Buy);
        assert_eq!(o.kind, OrderKind::Limit { price_micros: 100 * M });
        assert_eq!(o.qty, 20);
    }

    #[test]
    fn every_open_order_is_cancelled_first() {
        let mut done = resting(3);
        done.apply(&bkt_execution::OrderEvent::Cancel).unwrap();
        let open = [resting(1), resting(2), done];
        let out = decide(&BollingerParams::default(), &bar(100), &bands(), 0, &open);
        assert_eq!(out.cancels, vec![OrderId(1), OrderId(2)]);
        assert!(out.orders.is_empty());
    }

    #[test]
    fn size_comes_from_params() {
        let p = BollingerParams::new(40, 2.0, 7, false).unwrap();
        let out = decide(&p, &bar(85), &bands(), 0, &[]);
        assert_eq!(out.orders[0].qty, 7);
    }

    #[test]
    fn construction_rejects_bad_params() {
        assert!(matches!(
            BollingerParams::new(0, 2.0, 20, false),
            Err(StrategyConfigError::NonPositive { field: "period", .. })
        ));
        assert!(matches!(
            BollingerParams::new(40, 0.0, 20, false),
            Err(StrategyConfigError::InvalidDevfactor { .. })
        ));
        assert!(BollingerParams::new(40, f64::INFINITY, 20, false).is_err());
        assert!(matches!(
            BollingerParams::new(40, 2.0, -1, false),
            Err(StrategyConfigError::NonPositive { field: "size", .. })
        ));
        let bad = BollingerParams {
            size: 0,
            ..BollingerParams::default()
        };
        assert!(BollingerStrategy::new(bad).is_err());
    }
}
