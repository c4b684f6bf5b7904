//! Strategy journal lines.
//!
//! Each entry renders as one line. The engine forwards them to the
//! `bkt::journal` tracing target and keeps them in the report.

use std::fmt;

use bkt_execution::micros_to_price;
use chrono::DateTime;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalEntry {
    /// Per-bar snapshot emitted by debug-enabled strategies.
    BarSnapshot {
        data_name: String,
        bar_index: u64,
        ts: i64,
        open_micros: i64,
        high_micros: i64,
        low_micros: i64,
        close_micros: i64,
        volume: i64,
        position_qty: i64,
    },
    TradeClosed {
        data_name: String,
        bar_index: u64,
        ts: i64,
        trade_ref: u64,
        /// Gross PnL of the round trip.
        pnl_micros: i64,
    },
    Message { ts: i64, text: String },
}

fn fmt_datetime(ts: i64) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ts.to_string(),
    }
}

fn fmt_date(ts: i64) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => ts.to_string(),
    }
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BarSnapshot {
                data_name,
                bar_index,
                ts,
                open_micros,
                high_micros,
                low_micros,
                close_micros,
                volume,
                position_qty,
            } => write!(
                f,
                "NEXT data={} bar={} date={} open={:.2} high={:.2} low={:.2} close={:.2} volume={} position={}",
                data_name,
                bar_index,
                fmt_datetime(*ts),
                micros_to_price(*open_micros),
                micros_to_price(*high_micros),
                micros_to_price(*low_micros),
                micros_to_price(*close_micros),
                volume,
                position_qty,
            ),
            Self::TradeClosed {
                data_name,
                bar_index,
                ts,
                trade_ref,
                pnl_micros,
            } => write!(
                f,
                "TRADE data={} bar={} date={} status=closed ref={} pnl={:.2}",
                data_name,
                bar_index,
                fmt_date(*ts),
                trade_ref,
                micros_to_price(*pnl_micros),
            ),
            Self::Message { ts, text } => write!(f, "{}, {}", fmt_date(*ts), text),
        }
    }
}
