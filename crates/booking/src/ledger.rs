use std::collections::BTreeMap;

use gridpass_core::{DomainError, DomainResult, Entity, OrderId};

use crate::order::Order;

/// Global, order-id-indexed record of every live order.
///
/// Ids come from a monotonic counter that survives cancellations, so an id is
/// never handed out twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLedger {
    orders: BTreeMap<OrderId, Order>,
    next_id: OrderId,
}

impl Default for OrderLedger {
    fn default() -> Self {
        Self {
            orders: BTreeMap::new(),
            next_id: OrderId::new(1),
        }
    }
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted orders and counter.
    pub fn from_parts(
        orders: impl IntoIterator<Item = Order>,
        next_id: OrderId,
    ) -> DomainResult<Self> {
        if next_id.get() == 0 {
            return Err(DomainError::invariant("order ids start at 1"));
        }
        let mut ledger = Self {
            orders: BTreeMap::new(),
            next_id,
        };
        for order in orders {
            let id = order.id();
            if id >= next_id {
                return Err(DomainError::invariant(format!(
                    "order {id} is not below the next order id {next_id}"
                )));
            }
            if ledger.orders.insert(id, order).is_some() {
                return Err(DomainError::invariant(format!("duplicate order id {id}")));
            }
        }
        Ok(ledger)
    }

    /// The id the next purchase will receive.
    pub fn next_order_id(&self) -> OrderId {
        self.next_id
    }

    /// Id for a new order, as long as the counter can still advance past it.
    pub fn issue_order_id(&self) -> DomainResult<OrderId> {
        match self.next_id.next() {
            Some(_) => Ok(self.next_id),
            None => Err(DomainError::IdsExhausted("order")),
        }
    }

    pub(crate) fn insert(&mut self, order: Order) {
        let id = order.id();
        if let Some(next) = id.next().filter(|next| *next > self.next_id) {
            self.next_id = next;
        }
        self.orders.insert(id, order);
    }

    pub(crate) fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        self.orders.remove(&order_id)
    }

    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// Orders in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
