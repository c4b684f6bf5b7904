use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bkt_backtest::{BacktestReport, Bar};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bkt_config::ChartStyle;

use crate::chart::ChartRequest;
use crate::export::{
    write_equity_csv, write_fills_csv, write_metrics_json, write_orders_csv, write_trades_csv,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub config_hash: String,
    pub data_path: String,
    pub symbol: String,
    pub created_at_utc: DateTime<Utc>,
    pub strategies: Vec<StrategyArtifacts>,
}

/// Per-strategy output directory, relative to the run directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyArtifacts {
    pub name: String,
    pub dir: String,
    pub artifacts: ArtifactList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactList {
    pub fills_csv: String,
    pub orders_csv: String,
    pub trades_csv: String,
    pub equity_curve_csv: String,
    pub metrics_json: String,
    pub chart_json: Option<String>,
}

pub struct InitRunArtifactsArgs<'a> {
    pub exports_root: &'a Path, // e.g. ./exports
    pub schema_version: i32,
    pub run_id: Uuid,
    pub config_hash: &'a str,
    pub data_path: &'a str,
    pub symbol: &'a str,
}

/// An initialised run directory. The manifest is rewritten after every
/// strategy so a partial run still describes what it produced.
#[derive(Debug)]
pub struct RunArtifacts {
    pub run_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub manifest: RunManifest,
}

pub fn init_run_artifacts(args: InitRunArtifactsArgs<'_>) -> Result<RunArtifacts> {
    // exports/<run_id>/
    let run_dir = args.exports_root.join(args.run_id.to_string());
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("create exports dir failed: {}", run_dir.display()))?;

    let manifest = RunManifest {
        schema_version: args.schema_version,
        run_id: args.run_id,
        config_hash: args.config_hash.to_string(),
        data_path: args.data_path.to_string(),
        symbol: args.symbol.to_string(),
        created_at_utc: Utc::now(),
        strategies: Vec::new(),
    };

    let run = RunArtifacts {
        manifest_path: run_dir.join("manifest.json"),
        run_dir,
        manifest,
    };
    run.write_manifest()?;
    tracing::info!(run_dir = %run.run_dir.display(), "run artifacts initialised");
    Ok(run)
}

impl RunArtifacts {
    fn write_manifest(&self) -> Result<()> {
        let json =
            serde_json::to_string_pretty(&self.manifest).context("serialize manifest failed")?;
        fs::write(&self.manifest_path, format!("{json}\n")).with_context(|| {
            format!("write manifest failed: {}", self.manifest_path.display())
        })?;
        Ok(())
    }

    /// Write one strategy's outputs into `<run_dir>/<dir_name>/` and record
    /// them in the manifest. `chart` of `None` skips `chart.json`.
    pub fn write_strategy(
        &mut self,
        dir_name: &str,
        report: &BacktestReport,
        bars: &[Bar],
        chart: Option<ChartStyle>,
    ) -> Result<PathBuf> {
        let dir = self.run_dir.join(dir_name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("create strategy dir failed: {}", dir.display()))?;

        let artifacts = ArtifactList {
            fills_csv: "fills.csv".to_string(),
            orders_csv: "orders.csv".to_string(),
            trades_csv: "trades.csv".to_string(),
            equity_curve_csv: "equity_curve.csv".to_string(),
            metrics_json: "metrics.json".to_string(),
            chart_json: chart.map(|_| "chart.json".to_string()),
        };

        write_fills_csv(&dir.join(&artifacts.fills_csv), report)?;
        write_orders_csv(&dir.join(&artifacts.orders_csv), report)?;
        write_trades_csv(&dir.join(&artifacts.trades_csv), report)?;
        write_equity_csv(&dir.join(&artifacts.equity_curve_csv), report)?;
        write_metrics_json(&dir.join(&artifacts.metrics_json), report)?;

        if let (Some(style), Some(file)) = (chart, artifacts.chart_json.as_deref()) {
            let title = format!("{} {}", report.strategy, self.manifest.symbol);
            let req = ChartRequest::from_report(title, style, bars, report);
            let path = dir.join(file);
            let json = serde_json::to_string(&req).context("serialize chart request failed")?;
            fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("write chart request failed: {}", path.display()))?;
        }

        self.manifest.strategies.push(StrategyArtifacts {
            name: report.strategy.clone(),
            dir: dir_name.to_string(),
            artifacts,
        });
        self.write_manifest()?;
        Ok(dir)
    }
}
