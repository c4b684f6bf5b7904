//! bkt-execution
//!
//! Order contract between strategies and the replay engine.
//! - Strategies emit order intents (market / stop / limit) and cancels
//! - Orders carry an explicit lifecycle (Accepted -> Completed | Canceled | Margin)
//! - Trigger rules are pure functions of (order, bar prices)
//! - Prices are integer micros; f64 only at the ingestion/indicator boundary

mod book;
mod matching;
mod order;
mod prices;
mod types;

pub use book::{OrderBook, OrderError};
pub use matching::{apply_slippage, trigger_price, BarPrices};
pub use order::{Order, OrderEvent, OrderStatus, TransitionError};
pub use prices::{micros_to_price, price_to_micros, PricingError, MICROS_PER_UNIT};
pub use types::{OrderId, OrderIntent, OrderKind, Side, StrategyOutput};
