//! bkt-indicators
//!
//! Incremental indicators fed one close per bar. The rolling math comes from
//! the `ta` crate; this crate adds warm-up tracking so nothing is reported
//! until a full window has been seen.

mod bollinger;
mod crossover;
mod moving_average;

pub use bollinger::{Bands, Bollinger};
pub use crossover::CrossOver;
pub use moving_average::{Ema, Sma};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("{indicator}: period must be > 0, got {period}")]
    InvalidPeriod {
        indicator: &'static str,
        period: usize,
    },
    #[error("{indicator}: multiplier must be finite and > 0, got {value}")]
    InvalidMultiplier { indicator: &'static str, value: f64 },
}

/// Counts inputs until a window of `period` values is available.
#[derive(Debug, Clone)]
pub(crate) struct Warmup {
    period: usize,
    seen: usize,
}

impl Warmup {
    pub(crate) fn new(period: usize) -> Self {
        Self { period, seen: 0 }
    }

    /// Register one input; true once at least `period` inputs were seen.
    pub(crate) fn tick(&mut self) -> bool {
        if self.seen < self.period {
            self.seen += 1;
        }
        self.seen >= self.period
    }
}
