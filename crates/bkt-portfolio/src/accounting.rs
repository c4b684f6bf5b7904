use bkt_execution::Side;

use crate::types::{Fill, Lot, PortfolioState, PositionState};

fn mul_qty_price_micros(qty: i64, price_micros: i64) -> i128 {
    (qty as i128) * (price_micros as i128)
}

fn i128_to_i64_clamp(x: i128) -> i64 {
    x.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Apply a fill with FIFO lots and return the realized PnL it produced
/// (gross, fees excluded).
///
/// - Buy covers short lots oldest-first, the remainder opens a long lot;
///   cash -= qty*price + fee
/// - Sell reduces long lots oldest-first, the remainder opens a short lot;
///   cash += qty*price - fee
pub fn apply_fill(pf: &mut PortfolioState, f: &Fill) -> i64 {
    debug_assert!(f.qty > 0);

    let notional = i128_to_i64_clamp(mul_qty_price_micros(f.qty, f.price_micros));
    match f.side {
        Side::Buy => pf.cash_micros = pf.cash_micros.saturating_sub(notional),
        Side::Sell => pf.cash_micros = pf.cash_micros.saturating_add(notional),
    }
    pf.cash_micros = pf.cash_micros.saturating_sub(f.fee_micros);
    pf.fees_paid_micros = pf.fees_paid_micros.saturating_add(f.fee_micros);

    let pos = pf
        .positions
        .entry(f.symbol.clone())
        .or_insert_with(|| PositionState::new(f.symbol.clone()));

    let realized = consume_fifo(pos, f.side, f.qty, f.price_micros);
    pf.realized_pnl_micros = pf.realized_pnl_micros.saturating_add(realized);

    if pos.is_flat() {
        pf.positions.remove(&f.symbol);
    }
    realized
}

/// Close opposite-direction lots oldest-first; open a new lot with whatever
/// quantity is left.
fn consume_fifo(pos: &mut PositionState, side: Side, mut qty: i64, px: i64) -> i64 {
    let mut realized: i128 = 0;
    let closing_long = side == Side::Sell;

    while qty > 0 {
        let Some(front) = pos.lots.first_mut() else {
            break;
        };
        if (front.qty_signed > 0) != closing_long {
            break;
        }

        let take = front.abs_qty().min(qty);
        let entry = front.entry_price_micros as i128;
        realized += if closing_long {
            (px as i128 - entry) * take as i128
        } else {
            (entry - px as i128) * take as i128
        };

        let remaining = front.abs_qty() - take;
        if remaining == 0 {
            pos.lots.remove(0);
        } else {
            front.qty_signed = if closing_long { remaining } else { -remaining };
        }
        qty -= take;
    }

    if qty > 0 {
        pos.lots.push(Lot {
            qty_signed: side.sign() * qty,
            entry_price_micros: px,
        });
    }

    i128_to_i64_clamp(realized)
}
