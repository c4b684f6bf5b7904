use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bkt_backtest::{BacktestReport, RunMetrics};
use bkt_execution::micros_to_price;
use serde::Serialize;

use crate::ts_utc;

#[derive(Serialize)]
struct FillRow<'a> {
    ts_utc: String,
    symbol: &'a str,
    side: String,
    qty: i64,
    price: f64,
    fee: f64,
}

#[derive(Serialize)]
struct OrderRow<'a> {
    order_id: u64,
    symbol: &'a str,
    side: String,
    qty: i64,
    order_type: &'static str,
    price: Option<f64>,
    status: &'static str,
    submitted_bar: u64,
    filled_bar: Option<u64>,
    fill_price: Option<f64>,
    fee: f64,
}

#[derive(Serialize)]
struct TradeRow<'a> {
    trade_ref: u64,
    symbol: &'a str,
    opened_utc: String,
    closed_utc: String,
    bar_index: u64,
    pnl: f64,
    pnl_net: f64,
}

#[derive(Serialize)]
struct EquityRow {
    ts_utc: String,
    equity: f64,
}

/// Header is written even when there are no rows.
fn write_rows<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> Result<()> {
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("create csv failed: {}", path.display()))?;
    w.write_record(header)
        .with_context(|| format!("write csv header failed: {}", path.display()))?;
    for row in rows {
        w.serialize(row)
            .with_context(|| format!("write csv row failed: {}", path.display()))?;
    }
    w.flush()
        .with_context(|| format!("flush csv failed: {}", path.display()))?;
    Ok(())
}

pub fn write_fills_csv(path: &Path, report: &BacktestReport) -> Result<()> {
    write_rows(
        path,
        &["ts_utc", "symbol", "side", "qty", "price", "fee"],
        report.fills.iter().map(|f| FillRow {
            ts_utc: ts_utc(f.ts),
            symbol: &f.symbol,
            side: f.side.to_string(),
            qty: f.qty,
            price: micros_to_price(f.price_micros),
            fee: micros_to_price(f.fee_micros),
        }),
    )
}

pub fn write_orders_csv(path: &Path, report: &BacktestReport) -> Result<()> {
    write_rows(
        path,
        &[
            "order_id",
            "symbol",
            "side",
            "qty",
            "order_type",
            "price",
            "status",
            "submitted_bar",
            "filled_bar",
            "fill_price",
            "fee",
        ],
        report.orders.iter().map(|o| OrderRow {
            order_id: o.id.0,
            symbol: &o.intent.symbol,
            side: o.intent.side.to_string(),
            qty: o.intent.qty,
            order_type: o.intent.kind.label(),
            price: o.intent.kind.price_micros().map(micros_to_price),
            status: o.status.as_str(),
            submitted_bar: o.submitted_bar,
            filled_bar: o.filled_bar,
            fill_price: o.fill_price_micros.map(micros_to_price),
            fee: micros_to_price(o.fee_micros),
        }),
    )
}

pub fn write_trades_csv(path: &Path, report: &BacktestReport) -> Result<()> {
    write_rows(
        path,
        &[
            "trade_ref",
            "symbol",
            "opened_utc",
            "closed_utc",
            "bar_index",
            "pnl",
            "pnl_net",
        ],
        report.closed_trades.iter().map(|t| TradeRow {
            trade_ref: t.trade_ref,
            symbol: &t.symbol,
            opened_utc: ts_utc(t.opened_ts),
            closed_utc: ts_utc(t.closed_ts),
            bar_index: t.bar_index,
            pnl: micros_to_price(t.pnl_micros),
            pnl_net: micros_to_price(t.pnl_net_micros),
        }),
    )
}

pub fn write_equity_csv(path: &Path, report: &BacktestReport) -> Result<()> {
    write_rows(
        path,
        &["ts_utc", "equity"],
        report.equity_curve.iter().map(|(ts, eq)| EquityRow {
            ts_utc: ts_utc(*ts),
            equity: micros_to_price(*eq),
        }),
    )
}

pub fn write_metrics_json(path: &Path, report: &BacktestReport) -> Result<()> {
    let metrics = RunMetrics::from_report(report);
    let json = serde_json::to_string_pretty(&metrics).context("serialize metrics failed")?;
    fs::write(path, format!("{json}\n"))
        .with_context(|| format!("write metrics failed: {}", path.display()))?;
    Ok(())
}
