//! bkt-strategy
//!
//! Strategy contract for the replay engine.
//! - Strategies emit order intents and cancels; the engine owns matching and accounting
//! - Hook: on_bar -> StrategyBarResult (output + journal + plot values)
//! - Hook: on_trade_closed -> journal entries
//! - Context is read-only: current bar, position view, open orders
//! - Strategies are built explicitly from typed params (no registry)

mod host;
mod journal;
mod params;
pub mod strategies;
mod types;

pub use host::StrategyHost;
pub use journal::JournalEntry;
pub use params::{StrategyConfigError, StrategyParams};
pub use strategies::bollinger::{decide, BandState, BollingerParams, BollingerStrategy};
pub use strategies::log_price::{LogPriceParams, LogPriceStrategy};
pub use strategies::sma_cross::{SmaCrossParams, SmaCrossStrategy};
pub use strategies::sma_ema::{SmaEmaParams, SmaEmaStrategy};
pub use types::*;
