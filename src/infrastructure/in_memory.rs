use crate::domain::order::{Order, OrderId, OrderStatus};
use crate::domain::ports::OrderStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory order store.
///
/// Uses `Arc<RwLock<HashMap<OrderId, Order>>>` for shared concurrent access.
/// The conditional write holds the write lock across the status comparison
/// and the insert, which is what makes it a compare-and-swap.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn save(&self, order: Order) -> Result<Order> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn save_if_status(&self, order: Order, expected: OrderStatus) -> Result<Order> {
        let mut orders = self.orders.write().await;
        match orders.get(&order.id) {
            None => Err(PaymentError::NotFound(order.id)),
            Some(current) if current.status != expected => Err(PaymentError::Conflict(order.id)),
            Some(_) => {
                orders.insert(order.id, order.clone());
                Ok(order)
            }
        }
    }

    async fn delete(&self, id: OrderId) -> Result<()> {
        let mut orders = self.orders.write().await;
        match orders.remove(&id) {
            Some(_) => Ok(()),
            None => Err(PaymentError::NotFound(id)),
        }
    }

    async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect())
    }
}
