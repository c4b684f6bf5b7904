use std::collections::BTreeMap;

use bkt_execution::{
    apply_slippage, trigger_price, Order, OrderBook, OrderError, OrderEvent, OrderIntent,
    OrderKind, Side,
};
use bkt_portfolio::{
    apply_fill, compute_equity_micros, ClosedTrade, Fill, MarkMap, PortfolioState, TradeTracker,
};
use bkt_strategy::{
    Bar, JournalEntry, PositionView, Strategy, StrategyContext, StrategyHost, StrategyHostError,
};

use crate::types::{BacktestConfig, BacktestReport, PlotSeries};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BacktestError {
    #[error("negative timestamp: ts={ts}")]
    NegativeTimestamp { ts: i64 },
    /// Bars must arrive in strictly increasing time order.
    #[error("out-of-order bar: ts={ts} after ts={prev_ts}")]
    OutOfOrderBar { prev_ts: i64, ts: i64 },
    #[error("malformed bar at ts={ts}: {reason}")]
    MalformedBar { ts: i64, reason: &'static str },
    /// A negative value would make fills systematically favorable.
    #[error("{field} must be >= 0, got {value_bps} bps")]
    NegativeSlippage { field: &'static str, value_bps: i64 },
    #[error("commission_bps must be >= 0, got {value_bps}")]
    NegativeCommission { value_bps: i64 },
    #[error("initial cash must be > 0, got {cash_micros} micros")]
    NonPositiveCash { cash_micros: i64 },
    #[error("order intent qty must be > 0, got {qty}")]
    InvalidIntent { qty: i64 },
    #[error(transparent)]
    StrategyHost(#[from] StrategyHostError),
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// The backtest engine: deterministic bar replay for one strategy.
///
/// Pipeline per bar: VALIDATE -> MATCH -> PORTFOLIO -> STRATEGY -> BOOK -> EQUITY
pub struct BacktestEngine {
    config: BacktestConfig,
    host: StrategyHost,
    portfolio: PortfolioState,
    book: OrderBook,
    trades: TradeTracker,
    last_prices: MarkMap,
    fills: Vec<Fill>,
    closed_trades: Vec<ClosedTrade>,
    journal: Vec<JournalEntry>,
    plots: BTreeMap<String, PlotSeries>,
    equity_curve: Vec<(i64, i64)>,
    /// Bar counter, 1-based once the first bar is accepted.
    bar_count: u64,
    last_ts: Option<i64>,
}

impl BacktestEngine {
    pub fn new(config: BacktestConfig) -> Self {
        let portfolio = PortfolioState::new(config.initial_cash_micros);
        Self {
            config,
            host: StrategyHost::new(),
            portfolio,
            book: OrderBook::new(),
            trades: TradeTracker::new(),
            last_prices: BTreeMap::new(),
            fills: Vec::new(),
            closed_trades: Vec::new(),
            journal: Vec::new(),
            plots: BTreeMap::new(),
            equity_curve: Vec::new(),
            bar_count: 0,
            last_ts: None,
        }
    }

    /// Register the strategy. Must be called before run(); only one is allowed.
    pub fn add_strategy(&mut self, s: Box<dyn Strategy>) -> Result<(), BacktestError> {
        Ok(self.host.register(s)?)
    }

    fn validate_config(&self) -> Result<(), BacktestError> {
        if self.config.initial_cash_micros <= 0 {
            return Err(BacktestError::NonPositiveCash {
                cash_micros: self.config.initial_cash_micros,
            });
        }
        if self.config.commission_bps < 0 {
            return Err(BacktestError::NegativeCommission {
                value_bps: self.config.commission_bps,
            });
        }
        if self.config.stress.slippage_bps < 0 {
            return Err(BacktestError::NegativeSlippage {
                field: "slippage_bps",
                value_bps: self.config.stress.slippage_bps,
            });
        }
        Ok(())
    }

    fn validate_bar(&self, bar: &Bar) -> Result<(), BacktestError> {
        if bar.ts < 0 {
            return Err(BacktestError::NegativeTimestamp { ts: bar.ts });
        }
        if let Some(prev_ts) = self.last_ts {
            if bar.ts <= prev_ts {
                return Err(BacktestError::OutOfOrderBar {
                    prev_ts,
                    ts: bar.ts,
                });
            }
        }
        let malformed = |reason| BacktestError::MalformedBar { ts: bar.ts, reason };
        if bar.low_micros <= 0 {
            return Err(malformed("low must be > 0"));
        }
        if bar.high_micros < bar.open_micros.max(bar.close_micros) {
            return Err(malformed("high below open/close"));
        }
        if bar.low_micros > bar.open_micros.min(bar.close_micros) {
            return Err(malformed("low above open/close"));
        }
        Ok(())
    }

    /// Run the backtest on a sequence of bars.
    ///
    /// Per bar:
    /// 1. Validate bar (timestamp order, OHLC consistency)
    /// 2. Match open orders submitted on earlier bars, ascending id
    /// 3. Apply fills to portfolio; report closed trades to the strategy
    /// 4. Feed bar to the strategy; apply cancels, then submit new orders
    /// 5. Record equity at close
    pub fn run(&mut self, bars: &[Bar]) -> Result<BacktestReport, BacktestError> {
        self.validate_config()?;
        let spec = self.host.spec()?;

        for bar in bars {
            // 1. Validate bar
            self.validate_bar(bar)?;
            self.last_ts = Some(bar.ts);
            self.bar_count += 1;
            let bar_index = self.bar_count;

            self.last_prices
                .insert(bar.symbol.clone(), bar.close_micros);

            // 2-3. Match and fill
            self.match_orders(bar, bar_index, &spec.name)?;

            // 4. Strategy
            let open: Vec<Order> = self.book.open_orders().into_iter().cloned().collect();
            let position = self.position_view(&bar.symbol);
            let ctx = StrategyContext {
                bar_index,
                bar,
                position,
                open_orders: &open,
            };
            let result = self.host.on_bar(&ctx)?;

            for id in result.output.cancels {
                self.book.cancel(id)?;
            }
            for intent in result.output.orders {
                if intent.qty <= 0 {
                    return Err(BacktestError::InvalidIntent { qty: intent.qty });
                }
                self.book.submit(intent, bar_index);
            }
            self.record_journal(&spec.name, result.journal);
            for p in result.plots {
                self.plots
                    .entry(p.name.to_string())
                    .or_default()
                    .push((bar.ts, p.value));
            }

            // 5. Equity
            let equity = compute_equity_micros(
                self.portfolio.cash_micros,
                &self.portfolio.positions,
                &self.last_prices,
            );
            self.equity_curve.push((bar.ts, equity));
        }

        let final_value_micros = self
            .equity_curve
            .last()
            .map(|(_, e)| *e)
            .unwrap_or(self.config.initial_cash_micros);

        Ok(BacktestReport {
            strategy: spec.name,
            bars_processed: self.bar_count,
            starting_value_micros: self.config.initial_cash_micros,
            final_value_micros,
            equity_curve: self.equity_curve.clone(),
            fills: self.fills.clone(),
            orders: self.book.history(),
            closed_trades: self.closed_trades.clone(),
            journal: self.journal.clone(),
            plots: self.plots.clone(),
            last_prices: self.last_prices.clone(),
            final_cash_micros: self.portfolio.cash_micros,
            fees_paid_micros: self.portfolio.fees_paid_micros,
            realized_pnl_micros: self.portfolio.realized_pnl_micros,
        })
    }

    fn match_orders(
        &mut self,
        bar: &Bar,
        bar_index: u64,
        strategy: &str,
    ) -> Result<(), BacktestError> {
        let prices = bar.prices();

        for id in self.book.open_ids() {
            let Some(order) = self.book.get(id) else {
                continue;
            };
            // No same-bar fills.
            if order.submitted_bar >= bar_index || order.intent.symbol != bar.symbol {
                continue;
            }
            let intent = order.intent.clone();

            let Some(raw_price) = trigger_price(&intent.kind, intent.side, &prices) else {
                continue;
            };
            let price = match intent.kind {
                OrderKind::Limit { .. } => raw_price,
                OrderKind::Market | OrderKind::Stop { .. } => {
                    apply_slippage(raw_price, intent.side, self.config.stress.slippage_bps)
                }
            };
            let notional = price as i128 * intent.qty as i128;
            let fee = clamp_i64(notional * self.config.commission_bps as i128 / 10_000);

            if intent.side == Side::Buy
                && !self.is_risk_reducing(&intent)
                && notional + fee as i128 > self.portfolio.cash_micros as i128
            {
                tracing::warn!(
                    order_id = %id,
                    bar_index,
                    qty = intent.qty,
                    price_micros = price,
                    cash_micros = self.portfolio.cash_micros,
                    "order rejected: insufficient cash"
                );
                self.book.apply(id, &OrderEvent::Margin)?;
                continue;
            }

            self.book.apply(
                id,
                &OrderEvent::Complete {
                    price_micros: price,
                    fee_micros: fee,
                    bar_index,
                },
            )?;

            let fill = Fill::new(
                bar.ts,
                intent.symbol.as_str(),
                intent.side,
                intent.qty,
                price,
                fee,
            );
            let qty_before = self.portfolio.position_qty(&fill.symbol);
            let realized = apply_fill(&mut self.portfolio, &fill);
            let qty_after = self.portfolio.position_qty(&fill.symbol);
            tracing::debug!(
                order_id = %id,
                side = %fill.side,
                qty = fill.qty,
                price_micros = fill.price_micros,
                position = qty_after,
                "order filled"
            );

            if let Some(closed) =
                self.trades
                    .on_fill(&fill, qty_before, qty_after, realized, bar_index)
            {
                let entries = self.host.on_trade_closed(&closed)?;
                self.record_journal(strategy, entries);
                self.closed_trades.push(closed);
            }
            self.fills.push(fill);
        }
        Ok(())
    }

    /// A buy only reduces risk while it does not exceed an open short.
    fn is_risk_reducing(&self, intent: &OrderIntent) -> bool {
        let pos = self.portfolio.position_qty(&intent.symbol);
        let signed = intent.side.sign() * intent.qty;
        pos != 0 && pos.signum() != signed.signum() && signed.abs() <= pos.abs()
    }

    fn position_view(&self, symbol: &str) -> PositionView {
        match self.portfolio.position(symbol) {
            Some(p) => PositionView {
                qty: p.qty_signed(),
                avg_entry_price_micros: p.avg_entry_price_micros(),
            },
            None => PositionView::default(),
        }
    }

    fn record_journal(&mut self, strategy: &str, entries: Vec<JournalEntry>) {
        for e in entries {
            tracing::info!(target: "bkt::journal", strategy, "{}", e);
            self.journal.push(e);
        }
    }
}

fn clamp_i64(x: i128) -> i64 {
    x.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Build an engine for `strategy`, replay `bars`, return the report.
pub fn run_strategy(
    config: BacktestConfig,
    strategy: Box<dyn Strategy>,
    bars: &[Bar],
) -> Result<BacktestReport, BacktestError> {
    let mut engine = BacktestEngine::new(config);
    engine.add_strategy(strategy)?;
    engine.run(bars)
}
