//! Command handlers for bkt-cli.
//!
//! Shared config loading lives here; `run` has its own module.

pub mod run;

use anyhow::{Context, Result};
use bkt_config::{LoadedConfig, ModelConfig};
use bkt_strategy::Strategy;

/// Load, merge and validate the model config.
pub fn load_model(paths: &[String]) -> Result<(LoadedConfig, ModelConfig)> {
    let loaded = bkt_config::load_layered_yaml(paths).context("load layered config failed")?;
    let model = ModelConfig::from_loaded(&loaded)?;
    Ok((loaded, model))
}

pub fn config_hash(paths: &[String]) -> Result<()> {
    let loaded = bkt_config::load_layered_yaml(paths).context("load layered config failed")?;
    println!("config_hash={}", loaded.config_hash);
    println!("{}", loaded.canonical_json);
    Ok(())
}

pub fn validate(paths: &[String]) -> Result<()> {
    let (loaded, model) = load_model(paths)?;
    for (i, params) in model.strategies.iter().enumerate() {
        let strategy = params
            .build()
            .with_context(|| format!("strategies[{i}] build failed"))?;
        println!("strategy[{i}]={} kind={}", strategy.spec().name, params.kind());
    }
    println!("config_hash={}", loaded.config_hash);
    println!("config_ok=true");
    Ok(())
}
