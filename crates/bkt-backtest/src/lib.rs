//! bkt-backtest
//!
//! Deterministic bar replay.
//!
//! Pipeline per bar: VALIDATE -> MATCH -> PORTFOLIO -> STRATEGY -> BOOK -> EQUITY
//!
//! - Same bars + config => identical report
//! - Orders placed on bar N are first eligible on bar N+1
//! - Gap-aware stop/limit fills, stress slippage on market and stop fills
//! - Buys that would overdraw cash are rejected with status Margin
//! - FIFO portfolio accounting via bkt-portfolio

mod engine;
pub mod loader;
mod metrics;
pub mod types;

pub use bkt_strategy::Bar;
pub use engine::{run_strategy, BacktestEngine, BacktestError};
pub use loader::{load_bars_csv, parse_bars_csv, LoadError};
pub use metrics::RunMetrics;
pub use types::{BacktestConfig, BacktestReport, StressProfile};
