//! bkt-portfolio
//!
//! Fill-driven portfolio accounting for the replay engine.
//! - FIFO lot accounting, long and short
//! - Realized PnL per fill
//! - Equity = cash + Σ qty * mark
//! - Round-trip trade tracking (flat -> position -> flat)
//! - Pure deterministic logic (no IO, no clock)

mod accounting;
mod metrics;
mod trades;
mod types;

pub use accounting::apply_fill;
pub use metrics::compute_equity_micros;
pub use trades::{ClosedTrade, TradeTracker};
pub use types::{Fill, Lot, PortfolioState, PositionState};

use std::collections::BTreeMap;

/// Canonical mark map type (symbol -> price_micros).
pub type MarkMap = BTreeMap<String, i64>;
