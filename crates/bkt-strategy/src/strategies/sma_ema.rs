//! Buys whenever close sits above both averages and the SMA leads the EMA.

use bkt_execution::{OrderIntent, Side, StrategyOutput};
use bkt_indicators::{Ema, Sma};
use serde::{Deserialize, Serialize};

use crate::params::{require_period, require_positive, StrategyConfigError};
use crate::{PlotValue, Strategy, StrategyBarResult, StrategyContext, StrategySpec};

const NAME: &str = "sma_ema";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmaEmaParams {
    pub sma_period: usize,
    pub ema_period: usize,
    pub stake: i64,
}

impl Default for SmaEmaParams {
    fn default() -> Self {
        Self {
            sma_period: 30,
            ema_period: 30,
            stake: 1,
        }
    }
}

impl SmaEmaParams {
    pub fn validate(&self) -> Result<(), StrategyConfigError> {
        require_period(NAME, "sma_period", self.sma_period)?;
        require_period(NAME, "ema_period", self.ema_period)?;
        require_positive(NAME, "stake", self.stake)
    }
}

pub struct SmaEmaStrategy {
    params: SmaEmaParams,
    sma: Sma,
    ema: Ema,
}

impl SmaEmaStrategy {
    pub fn new(params: SmaEmaParams) -> Result<Self, StrategyConfigError> {
        params.validate()?;
        Ok(Self {
            sma: Sma::new(params.sma_period)?,
            ema: Ema::new(params.ema_period)?,
            params,
        })
    }
}

impl Strategy for SmaEmaStrategy {
    fn spec(&self) -> StrategySpec {
        StrategySpec::new(NAME)
    }

    fn on_bar(&mut self, ctx: &StrategyContext<'_>) -> StrategyBarResult {
        let close = ctx.bar.close();
        let (Some(sma), Some(ema)) = (self.sma.next(close), self.ema.next(close)) else {
            return StrategyBarResult::idle();
        };

        let mut res = StrategyBarResult {
            plots: vec![PlotValue::new("sma", sma), PlotValue::new("ema", ema)],
            ..StrategyBarResult::idle()
        };
        if close > sma && close > ema && sma - ema > 0.0 {
            res.output = StrategyOutput::new(
                Vec::new(),
                vec![OrderIntent::market(
                    ctx.bar.symbol.as_str(),
                    Side::Buy,
                    self.params.stake,
                )],
            );
        }
        res
    }
}
