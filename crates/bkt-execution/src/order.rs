//! Simulated order lifecycle.
//!
//! ```text
//!              Complete
//!   Accepted ───────────► Completed (term.)
//!      │  │    Cancel
//!      │  └─────────────► Canceled  (term.)
//!      │       Margin
//!      └────────────────► Margin    (term.)
//! ```
//!
//! Every event is applied through [`Order::apply`]. Events on a terminal
//! order are illegal and leave the order untouched.

use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderIntent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Resting in the book, eligible for matching from the next bar.
    Accepted,
    /// Fully filled. **Terminal.**
    Completed,
    /// Cancelled by the strategy. **Terminal.**
    Canceled,
    /// Triggered but rejected for insufficient cash. **Terminal.**
    Margin,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Accepted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Margin => "margin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEvent {
    Complete {
        price_micros: i64,
        fee_micros: i64,
        bar_index: u64,
    },
    Cancel,
    Margin,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal order transition: order {order_id} is {from:?}, got {event}")]
pub struct TransitionError {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub intent: OrderIntent,
    pub status: OrderStatus,
    /// Bar index (1-based) on which the order was submitted.
    pub submitted_bar: u64,
    pub filled_bar: Option<u64>,
    pub fill_price_micros: Option<i64>,
    pub fee_micros: i64,
}

impl Order {
    pub fn new(id: OrderId, intent: OrderIntent, submitted_bar: u64) -> Self {
        Self {
            id,
            intent,
            status: OrderStatus::Accepted,
            submitted_bar,
            filled_bar: None,
            fill_price_micros: None,
            fee_micros: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Accepted
    }

    pub fn apply(&mut self, event: &OrderEvent) -> Result<(), TransitionError> {
        use OrderEvent as E;
        use OrderStatus as S;

        match (self.status, event) {
            (
                S::Accepted,
                E::Complete {
                    price_micros,
                    fee_micros,
                    bar_index,
                },
            ) => {
                self.status = S::Completed;
                self.fill_price_micros = Some(*price_micros);
                self.fee_micros = *fee_micros;
                self.filled_bar = Some(*bar_index);
            }
            (S::Accepted, E::Cancel) => self.status = S::Canceled,
            (S::Accepted, E::Margin) => self.status = S::Margin,
            (from, ev) => {
                return Err(TransitionError {
                    order_id: self.id,
                    from,
                    event: format!("{ev:?}"),
                });
            }
        }
        Ok(())
    }
}
