pub mod bollinger;
pub mod log_price;
pub mod sma_cross;
pub mod sma_ema;
