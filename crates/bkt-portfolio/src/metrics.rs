use std::collections::BTreeMap;

use crate::types::PositionState;
use crate::MarkMap;

fn i128_to_i64_clamp(x: i128) -> i64 {
    x.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Equity = cash + Σ(qty * mark). Symbols without a mark count as zero.
pub fn compute_equity_micros(
    cash_micros: i64,
    positions: &BTreeMap<String, PositionState>,
    marks: &MarkMap,
) -> i64 {
    let mut mv: i128 = cash_micros as i128;
    for (sym, pos) in positions {
        let mark = *marks.get(sym).unwrap_or(&0);
        mv += pos.qty_signed() as i128 * mark as i128;
    }
    i128_to_i64_clamp(mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{apply_fill, Fill, PortfolioState};
    use bkt_execution::Side;

    const M: i64 = 1_000_000;

    #[test]
    fn equity_marks_short_position_against_cash() {
        let mut pf = PortfolioState::new(1_000 * M);
        apply_fill(&mut pf, &Fill::new(0, "SPY", Side::Sell, 2, 100 * M, 0));
        let marks: MarkMap = [("SPY".to_string(), 90 * M)].into_iter().collect();

        // cash 1200, short 2 @ 90 => 1200 - 180
        assert_eq!(
            compute_equity_micros(pf.cash_micros, &pf.positions, &marks),
            1_020 * M
        );
    }
}
