//! bkt-artifacts
//!
//! Run outputs under `exports/<run_id>/`:
//! - `manifest.json`: run id, config hash, data source, per-strategy directories
//! - per strategy: `fills.csv`, `orders.csv`, `trades.csv`, `equity_curve.csv`,
//!   `metrics.json`, and `chart.json` (render request for an external plotter)

mod chart;
mod export;
mod manifest;

pub use chart::{Candle, ChartRequest, Marker, Overlay};
pub use export::{
    write_equity_csv, write_fills_csv, write_metrics_json, write_orders_csv, write_trades_csv,
};
pub use manifest::{
    init_run_artifacts, ArtifactList, InitRunArtifactsArgs, RunArtifacts, RunManifest,
    StrategyArtifacts,
};

use chrono::DateTime;

/// Epoch seconds as RFC 3339 UTC; out-of-range values fall back to the raw number.
pub(crate) fn ts_utc(ts: i64) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.to_rfc3339(),
        None => ts.to_string(),
    }
}
