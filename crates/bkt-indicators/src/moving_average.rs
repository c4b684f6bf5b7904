use ta::indicators::{ExponentialMovingAverage, SimpleMovingAverage};
use ta::Next;

use crate::{IndicatorError, Warmup};

/// Simple moving average of the last `period` inputs.
#[derive(Debug, Clone)]
pub struct Sma {
    inner: SimpleMovingAverage,
    warmup: Warmup,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let inner = SimpleMovingAverage::new(period).map_err(|_| IndicatorError::InvalidPeriod {
            indicator: "sma",
            period,
        })?;
        Ok(Self {
            inner,
            warmup: Warmup::new(period),
        })
    }

    pub fn next(&mut self, value: f64) -> Option<f64> {
        let out = self.inner.next(value);
        self.warmup.tick().then_some(out)
    }
}

/// Exponential moving average, smoothing 2 / (period + 1).
///
/// The first reading is the simple mean of the first `period` inputs;
/// smoothing starts from that seed.
#[derive(Debug, Clone)]
pub struct Ema {
    inner: ExponentialMovingAverage,
    seed: Sma,
    seeded: bool,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let inner =
            ExponentialMovingAverage::new(period).map_err(|_| IndicatorError::InvalidPeriod {
                indicator: "ema",
                period,
            })?;
        Ok(Self {
            inner,
            seed: Sma::new(period)?,
            seeded: false,
        })
    }

    pub fn next(&mut self, value: f64) -> Option<f64> {
        if self.seeded {
            return Some(self.inner.next(value));
        }
        // ta's EMA takes its first input as the starting value.
        let mean = self.seed.next(value)?;
        self.seeded = true;
        Some(self.inner.next(mean))
    }
}
