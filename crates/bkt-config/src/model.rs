//! Typed view of the merged model config.
//!
//! Every section rejects unknown keys. A typo in a YAML layer fails the load
//! instead of silently falling back to a default.

use anyhow::{bail, Context, Result};
use bkt_execution::price_to_micros;
use bkt_strategy::StrategyParams;
use serde::{Deserialize, Serialize};

use crate::LoadedConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub data: DataConfig,
    pub broker: BrokerConfig,
    pub strategies: Vec<StrategyParams>,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub exports: ExportsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub path: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    pub cash: f64,
    #[serde(default)]
    pub commission_bps: i64,
    #[serde(default)]
    pub slippage_bps: i64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStyle {
    Candlestick,
    Line,
}

impl ChartStyle {
    /// Bollinger runs are drawn as candles, everything else as a close line.
    pub fn default_for(params: &StrategyParams) -> Self {
        match params {
            StrategyParams::Bollinger(_) => Self::Candlestick,
            StrategyParams::SmaCross(_)
            | StrategyParams::LogPrice(_)
            | StrategyParams::SmaEma(_) => Self::Line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Overrides the per-strategy default style for every strategy.
    #[serde(default)]
    pub style: Option<ChartStyle>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            style: None,
        }
    }
}

impl ChartConfig {
    /// Style for one strategy's chart, `None` when charts are disabled.
    pub fn style_for(&self, params: &StrategyParams) -> Option<ChartStyle> {
        if !self.enabled {
            return None;
        }
        Some(self.style.unwrap_or_else(|| ChartStyle::default_for(params)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportsConfig {
    #[serde(default = "default_exports_dir")]
    pub dir: String,
}

impl Default for ExportsConfig {
    fn default() -> Self {
        Self {
            dir: default_exports_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_exports_dir() -> String {
    "exports".to_string()
}

impl ModelConfig {
    /// Deserialize and validate the merged document.
    pub fn from_loaded(loaded: &LoadedConfig) -> Result<Self> {
        let cfg: ModelConfig = serde_json::from_value(loaded.config_json.clone())
            .context("model config does not match schema")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.data.symbol.trim().is_empty() {
            bail!("data.symbol must not be empty");
        }
        if self.data.path.trim().is_empty() {
            bail!("data.path must not be empty");
        }
        if !self.broker.cash.is_finite() || self.broker.cash <= 0.0 {
            bail!("broker.cash must be > 0, got {}", self.broker.cash);
        }
        if self.broker.commission_bps < 0 {
            bail!(
                "broker.commission_bps must be >= 0, got {}",
                self.broker.commission_bps
            );
        }
        if self.broker.slippage_bps < 0 {
            bail!(
                "broker.slippage_bps must be >= 0, got {}",
                self.broker.slippage_bps
            );
        }
        if self.strategies.is_empty() {
            bail!("strategies must list at least one strategy");
        }
        for (i, s) in self.strategies.iter().enumerate() {
            s.validate()
                .with_context(|| format!("strategies[{i}] ({}) is invalid", s.kind()))?;
        }
        self.cash_micros()?;
        Ok(())
    }

    pub fn cash_micros(&self) -> Result<i64> {
        price_to_micros(self.broker.cash).context("broker.cash out of range")
    }
}
