use std::collections::BTreeMap;

use crate::order::{Order, OrderEvent, TransitionError};
use crate::types::{OrderId, OrderIntent};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("unknown order id {0}")]
    UnknownOrder(OrderId),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// The simulated broker's order book: every order ever submitted, keyed by id.
///
/// Iteration is in ascending id order, so matching is deterministic.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    next_id: u64,
    orders: BTreeMap<OrderId, Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, intent: OrderIntent, bar_index: u64) -> OrderId {
        self.next_id += 1;
        let id = OrderId(self.next_id);
        self.orders.insert(id, Order::new(id, intent, bar_index));
        tracing::debug!(order_id = %id, bar_index, "order accepted");
        id
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn open_orders(&self) -> Vec<&Order> {
        self.orders.values().filter(|o| o.is_open()).collect()
    }

    pub fn open_ids(&self) -> Vec<OrderId> {
        self.orders
            .values()
            .filter(|o| o.is_open())
            .map(|o| o.id)
            .collect()
    }

    pub fn has_open(&self) -> bool {
        self.orders.values().any(|o| o.is_open())
    }

    pub fn cancel(&mut self, id: OrderId) -> Result<(), OrderError> {
        self.apply(id, &OrderEvent::Cancel)
    }

    pub fn apply(&mut self, id: OrderId, event: &OrderEvent) -> Result<(), OrderError> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or(OrderError::UnknownOrder(id))?;
        order.apply(event)?;
        Ok(())
    }

    /// All orders in id order, including terminal ones.
    pub fn history(&self) -> Vec<Order> {
        self.orders.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderStatus;
    use crate::types::Side;

    #[test]
    fn ids_are_monotonic_and_open_orders_sorted() {
        let mut book = OrderBook::new();
        let a = book.submit(OrderIntent::stop("SPY", Side::Sell, 110, 20), 1);
        let b = book.submit(OrderIntent::limit("SPY", Side::Buy, 100, 20), 1);
        assert!(a < b);
        let open: Vec<OrderId> = book.open_orders().iter().map(|o| o.id).collect();
        assert_eq!(open, vec![a, b]);
    }

    #[test]
    fn cancel_removes_from_open_set_but_keeps_history() {
        let mut book = OrderBook::new();
        let a = book.submit(OrderIntent::market("SPY", Side::Buy, 1), 1);
        book.cancel(a).unwrap();
        assert!(!book.has_open());
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(a).unwrap().status, OrderStatus::Canceled);
    }

    #[test]
    fn cancel_twice_is_a_transition_error() {
        let mut book = OrderBook::new();
        let a = book.submit(OrderIntent::market("SPY", Side::Buy, 1), 1);
        book.cancel(a).unwrap();
        assert!(matches!(book.cancel(a), Err(OrderError::Transition(_))));
    }

    #[test]
    fn unknown_order_is_reported() {
        let mut book = OrderBook::new();
        assert_eq!(
            book.cancel(OrderId(42)),
            Err(OrderError::UnknownOrder(OrderId(42)))
        );
    }
}
