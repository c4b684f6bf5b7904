//! Long-only moving-average crossover.

use bkt_execution::{OrderIntent, Side, StrategyOutput};
use bkt_indicators::{CrossOver, Sma};
use serde::{Deserialize, Serialize};

use crate::params::{require_period, require_positive, StrategyConfigError};
use crate::{PlotValue, Strategy, StrategyBarResult, StrategyContext, StrategySpec};

const NAME: &str = "sma_cross";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmaCrossParams {
    pub fast: usize,
    pub slow: usize,
    pub stake: i64,
}

impl Default for SmaCrossParams {
    fn default() -> Self {
        Self {
            fast: 10,
            slow: 30,
            stake: 1,
        }
    }
}

impl SmaCrossParams {
    pub fn validate(&self) -> Result<(), StrategyConfigError> {
        require_period(NAME, "fast", self.fast)?;
        require_period(NAME, "slow", self.slow)?;
        require_positive(NAME, "stake", self.stake)
    }
}

pub struct SmaCrossStrategy {
    params: SmaCrossParams,
    fast: Sma,
    slow: Sma,
    cross: CrossOver,
}

impl SmaCrossStrategy {
    pub fn new(params: SmaCrossParams) -> Result<Self, StrategyConfigError> {
        params.validate()?;
        Ok(Self {
            fast: Sma::new(params.fast)?,
            slow: Sma::new(params.slow)?,
            cross: CrossOver::new(),
            params,
        })
    }
}

impl Strategy for SmaCrossStrategy {
    fn spec(&self) -> StrategySpec {
        StrategySpec::new(NAME)
    }

    fn on_bar(&mut self, ctx: &StrategyContext<'_>) -> StrategyBarResult {
        let close = ctx.bar.close();
        let fast = self.fast.next(close);
        let slow = self.slow.next(close);

        let mut res = StrategyBarResult::idle();
        if let Some(f) = fast {
            res.plots.push(PlotValue::new("sma_fast", f));
        }
        let (Some(f), Some(s)) = (fast, slow) else {
            return res;
        };
        res.plots.push(PlotValue::new("sma_slow", s));

        let signal = self.cross.next(f, s);
        if !ctx.open_orders.is_empty() {
            return res;
        }

        let symbol = ctx.bar.symbol.as_str();
        let qty = ctx.position.qty;
        if qty == 0 && signal > 0 {
            res.output = StrategyOutput::new(
                Vec::new(),
                vec![OrderIntent::market(symbol, Side::Buy, self.params.stake)],
            );
        } else if qty > 0 && signal < 0 {
            res.output =
                StrategyOutput::new(Vec::new(), vec![OrderIntent::market(symbol, Side::Sell, qty)]);
        }
        res
    }
}
