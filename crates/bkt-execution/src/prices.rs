//! Integer-micros price representation.
//!
//! Orders, fills, cash and bars are all `i64` micros (1 unit = 1_000_000).
//! Two trigger prices that would compare equal as `f64` but differ at the
//! sixth decimal stay distinguishable.
//!
//! `f64` crosses the boundary in two places only:
//!
//! | Direction                     | Function            |
//! |-------------------------------|---------------------|
//! | CSV ingest / indicator output | [`price_to_micros`] |
//! | indicator input / reporting   | [`micros_to_price`] |

/// Scale factor: 1 price unit = 1_000_000 micros (6 decimal places).
pub const MICROS_PER_UNIT: i64 = 1_000_000;

/// Returned by [`price_to_micros`] when the input is not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("price_to_micros: non-finite input (NaN or Inf)")]
    NotFinite,
    #[error("price_to_micros: price out of i64 range after scaling")]
    OutOfRange,
}

pub fn micros_to_price(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_UNIT as f64
}

/// Convert an `f64` price into integer micros, rounding to the nearest micro.
///
/// Both checks fire in all build profiles.
pub fn price_to_micros(price: f64) -> Result<i64, PricingError> {
    if !price.is_finite() {
        return Err(PricingError::NotFinite);
    }
    let scaled = price * MICROS_PER_UNIT as f64;
    if scaled > i64::MAX as f64 || scaled < i64::MIN as f64 {
        return Err(PricingError::OutOfRange);
    }
    Ok(scaled.round() as i64)
}
