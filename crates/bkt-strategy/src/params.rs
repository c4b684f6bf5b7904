use bkt_indicators::IndicatorError;
use serde::{Deserialize, Serialize};

use crate::strategies::bollinger::{BollingerParams, BollingerStrategy};
use crate::strategies::log_price::{LogPriceParams, LogPriceStrategy};
use crate::strategies::sma_cross::{SmaCrossParams, SmaCrossStrategy};
use crate::strategies::sma_ema::{SmaEmaParams, SmaEmaStrategy};
use crate::Strategy;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StrategyConfigError {
    #[error("{strategy}: {field} must be > 0, got {value}")]
    NonPositive {
        strategy: &'static str,
        field: &'static str,
        value: i64,
    },
    #[error("{strategy}: devfactor must be finite and > 0, got {value}")]
    InvalidDevfactor { strategy: &'static str, value: f64 },
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

pub(crate) fn require_positive(
    strategy: &'static str,
    field: &'static str,
    value: i64,
) -> Result<(), StrategyConfigError> {
    if value <= 0 {
        return Err(StrategyConfigError::NonPositive {
            strategy,
            field,
            value,
        });
    }
    Ok(())
}

pub(crate) fn require_period(
    strategy: &'static str,
    field: &'static str,
    value: usize,
) -> Result<(), StrategyConfigError> {
    if value == 0 {
        return Err(StrategyConfigError::NonPositive {
            strategy,
            field,
            value: 0,
        });
    }
    Ok(())
}

/// Typed strategy selection, one entry per `strategies:` item in the model
/// config. `kind` picks the variant; remaining keys are its parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyParams {
    SmaCross(SmaCrossParams),
    LogPrice(LogPriceParams),
    SmaEma(SmaEmaParams),
    Bollinger(BollingerParams),
}

impl StrategyParams {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SmaCross(_) => "sma_cross",
            Self::LogPrice(_) => "log_price",
            Self::SmaEma(_) => "sma_ema",
            Self::Bollinger(_) => "bollinger",
        }
    }

    pub fn validate(&self) -> Result<(), StrategyConfigError> {
        match self {
            Self::SmaCross(p) => p.validate(),
            Self::LogPrice(_) => Ok(()),
            Self::SmaEma(p) => p.validate(),
            Self::Bollinger(p) => p.validate(),
        }
    }

    /// Validate and construct. Nothing is built from invalid params.
    pub fn build(&self) -> Result<Box<dyn Strategy>, StrategyConfigError> {
        let s: Box<dyn Strategy> = match self {
            Self::SmaCross(p) => Box::new(SmaCrossStrategy::new(p.clone())?),
            Self::LogPrice(p) => Box::new(LogPriceStrategy::new(p.clone())),
            Self::SmaEma(p) => Box::new(SmaEmaStrategy::new(p.clone())?),
            Self::Bollinger(p) => Box::new(BollingerStrategy::new(p.clone())?),
        };
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tag_selects_variant_and_fills_defaults() {
        let p: StrategyParams =
            serde_json::from_value(serde_json::json!({"kind": "bollinger", "size": 5})).unwrap();
        match &p {
            StrategyParams::Bollinger(b) => {
                assert_eq!(b.period, 40);
                assert_eq!(b.devfactor, 2.0);
                assert_eq!(b.size, 5);
                assert!(!b.debug);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        assert_eq!(p.kind(), "bollinger");
        assert_eq!(p.build().unwrap().spec().name, "bollinger");
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let r: Result<StrategyParams, _> =
            serde_json::from_value(serde_json::json!({"kind": "sma_cross", "fats": 5}));
        assert!(r.is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let r: Result<StrategyParams, _> =
            serde_json::from_value(serde_json::json!({"kind": "fractal_boll"}));
        assert!(r.is_err());
    }

    #[test]
    fn build_rejects_invalid_params() {
        let p = StrategyParams::SmaEma(SmaEmaParams {
            sma_period: 0,
            ..SmaEmaParams::default()
        });
        assert!(matches!(
            p.build().err(),
            Some(StrategyConfigError::NonPositive {
                field: "sma_period",
                ..
            })
        ));
    }
}
