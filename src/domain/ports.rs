use super::order::{Order, OrderId, OrderStatus};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type OrderStoreArc = Arc<dyn OrderStore>;
pub type PaymentGatewayArc = Arc<dyn PaymentGateway>;

/// Abstract keyed store for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;
    async fn save(&self, order: Order) -> Result<Order>;
    /// Conditional write: persists only while the stored order's status still
    /// equals `expected`; otherwise fails with `Conflict` and leaves the
    /// record untouched. This is the compare-and-swap settlement relies on.
    async fn save_if_status(&self, order: Order, expected: OrderStatus) -> Result<Order>;
    async fn delete(&self, id: OrderId) -> Result<()>;
    async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>>;
}

/// External payment endpoint probe.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Calls the endpoint; `Ok` on any 2xx response, `Gateway` error on any
    /// non-2xx status or transport failure.
    async fn charge(&self, url: &str) -> Result<()>;
}
