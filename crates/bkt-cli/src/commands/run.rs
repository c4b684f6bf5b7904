//! `bkt run`: one independent backtest per configured strategy, sequentially,
//! over the same bars.

use std::path::Path;

use anyhow::{Context, Result};
use bkt_artifacts::{init_run_artifacts, InitRunArtifactsArgs};
use bkt_backtest::{load_bars_csv, run_strategy, BacktestConfig, StressProfile};
use bkt_execution::micros_to_price;
use uuid::Uuid;

use super::load_model;

const ARTIFACT_SCHEMA_VERSION: i32 = 1;

pub fn run(config_paths: &[String], out: Option<&str>) -> Result<()> {
    let (loaded, model) = load_model(config_paths)?;

    let bars = load_bars_csv(&model.data.path, &model.data.symbol)
        .with_context(|| format!("load bars csv failed: {}", model.data.path))?;
    if bars.is_empty() {
        anyhow::bail!("no bars loaded from {}", model.data.path);
    }

    let config = BacktestConfig {
        initial_cash_micros: model.cash_micros()?,
        commission_bps: model.broker.commission_bps,
        stress: StressProfile {
            slippage_bps: model.broker.slippage_bps,
        },
    };

    let run_id = Uuid::new_v4();
    let exports_root = out.unwrap_or(&model.exports.dir);
    let mut artifacts = init_run_artifacts(InitRunArtifactsArgs {
        exports_root: Path::new(exports_root),
        schema_version: ARTIFACT_SCHEMA_VERSION,
        run_id,
        config_hash: &loaded.config_hash,
        data_path: &model.data.path,
        symbol: &model.data.symbol,
    })?;

    println!("run_id={}", run_id);
    println!("config_hash={}", loaded.config_hash);
    println!("bars_loaded={}", bars.len());

    for (i, params) in model.strategies.iter().enumerate() {
        let strategy = params
            .build()
            .with_context(|| format!("strategies[{i}] build failed"))?;
        tracing::info!(index = i, kind = params.kind(), "strategy run start");

        let report = run_strategy(config.clone(), strategy, &bars)
            .with_context(|| format!("strategies[{i}] ({}) run failed", params.kind()))?;

        println!("strategy={}", report.strategy);
        println!(
            "starting_value={:.2}",
            micros_to_price(report.starting_value_micros)
        );
        println!("final_value={:.2}", micros_to_price(report.final_value_micros));

        let dir_name = format!("{:02}_{}", i, params.kind());
        let chart = model.chart.style_for(params);
        let dir = artifacts.write_strategy(&dir_name, &report, &bars, chart)?;
        tracing::info!(
            strategy = %report.strategy,
            fills = report.fills.len(),
            trades = report.closed_trades.len(),
            dir = %dir.display(),
            "strategy run done"
        );
    }

    println!("artifacts_dir={}", artifacts.run_dir.display());
    Ok(())
}
