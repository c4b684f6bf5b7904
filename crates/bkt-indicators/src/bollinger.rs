use ta::indicators::BollingerBands;
use ta::Next;

use crate::{IndicatorError, Warmup};

/// One reading of the band triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub mid: f64,
    pub top: f64,
    pub bot: f64,
}

/// Rolling mean ± `devfactor` · population standard deviation.
#[derive(Debug, Clone)]
pub struct Bollinger {
    inner: BollingerBands,
    warmup: Warmup,
}

impl Bollinger {
    pub fn new(period: usize, devfactor: f64) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidPeriod {
                indicator: "bollinger",
                period,
            });
        }
        if !devfactor.is_finite() || devfactor <= 0.0 {
            return Err(IndicatorError::InvalidMultiplier {
                indicator: "bollinger",
                value: devfactor,
            });
        }
        let inner = BollingerBands::new(period, devfactor).map_err(|_| {
            IndicatorError::InvalidPeriod {
                indicator: "bollinger",
                period,
            }
        })?;
        Ok(Self {
            inner,
            warmup: Warmup::new(period),
        })
    }

    pub fn next(&mut self, close: f64) -> Option<Bands> {
        let out = self.inner.next(close);
        self.warmup.tick().then_some(Bands {
            mid: out.average,
            top: out.upper,
            bot: out.lower,
        })
    }
}
