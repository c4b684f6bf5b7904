use bkt_execution::OrderStatus;
use serde::Serialize;

use crate::types::BacktestReport;

/// Summary numbers for one run. Money in micros.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunMetrics {
    pub strategy: String,
    pub bars: u64,
    pub starting_value_micros: i64,
    pub final_value_micros: i64,
    pub pnl_micros: i64,
    pub realized_pnl_micros: i64,
    pub fees_paid_micros: i64,
    /// Peak-to-trough drop of the equity curve.
    pub max_drawdown_micros: i64,
    pub orders_submitted: usize,
    pub orders_completed: usize,
    pub orders_canceled: usize,
    pub orders_margin: usize,
    pub trades_closed: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
}

impl RunMetrics {
    pub fn from_report(r: &BacktestReport) -> Self {
        let count = |s: OrderStatus| r.orders.iter().filter(|o| o.status == s).count();

        let mut peak = r.starting_value_micros;
        let mut max_dd = 0i64;
        for (_, eq) in &r.equity_curve {
            peak = peak.max(*eq);
            max_dd = max_dd.max(peak.saturating_sub(*eq));
        }

        Self {
            strategy: r.strategy.clone(),
            bars: r.bars_processed,
            starting_value_micros: r.starting_value_micros,
            final_value_micros: r.final_value_micros,
            pnl_micros: r.final_value_micros.saturating_sub(r.starting_value_micros),
            realized_pnl_micros: r.realized_pnl_micros,
            fees_paid_micros: r.fees_paid_micros,
            max_drawdown_micros: max_dd,
            orders_submitted: r.orders.len(),
            orders_completed: count(OrderStatus::Completed),
            orders_canceled: count(OrderStatus::Canceled),
            orders_margin: count(OrderStatus::Margin),
            trades_closed: r.closed_trades.len(),
            trades_won: r.closed_trades.iter().filter(|t| t.pnl_net_micros > 0).count(),
            trades_lost: r.closed_trades.iter().filter(|t| t.pnl_net_micros < 0).count(),
        }
    }
}
