use super::dispatcher::PaymentDispatcher;
use crate::domain::order::{Order, OrderId, OrderItem, OrderStatus};
use crate::domain::ports::OrderStoreArc;
use crate::domain::state_machine;
use crate::error::{PaymentError, Result};
use std::sync::Arc;

/// Caller-facing order operations.
///
/// All mutations route through the NEW-status guard before touching the
/// store; settlement itself is delegated to the dispatcher and observed by
/// reading the order back later.
pub struct OrderService {
    store: OrderStoreArc,
    dispatcher: Arc<PaymentDispatcher>,
}

impl OrderService {
    pub fn new(store: OrderStoreArc, dispatcher: Arc<PaymentDispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Creates a NEW order with a freshly assigned id and a computed total.
    pub async fn create(
        &self,
        customer_id: impl Into<String>,
        items: Vec<OrderItem>,
    ) -> Result<Order> {
        let order = Order::new(customer_id, items)?;
        self.store.save(order).await
    }

    pub async fn get(&self, id: OrderId) -> Result<Order> {
        self.store
            .get(id)
            .await?
            .ok_or(PaymentError::NotFound(id))
    }

    pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        self.store.list(status).await
    }

    /// Replaces the item list of a NEW order and recomputes its total.
    pub async fn update_items(&self, id: OrderId, items: Vec<OrderItem>) -> Result<Order> {
        let mut order = self.get(id).await?;
        state_machine::require_new(&order)?;
        order.replace_items(items)?;
        self.store.save_if_status(order, OrderStatus::New).await
    }

    /// Deletes an order; permitted only while it is NEW.
    pub async fn delete(&self, id: OrderId) -> Result<()> {
        let order = self.get(id).await?;
        state_machine::require_new(&order)?;
        self.store.delete(id).await
    }

    /// Hands the order's payment to the pipeline.
    ///
    /// Rejected unless the order is NEW at check time. Returns as soon as the
    /// message is queued; the settlement outcome is visible only through a
    /// later `get`.
    pub async fn dispatch_payment(&self, id: OrderId) -> Result<()> {
        let order = self.get(id).await?;
        state_machine::require_new(&order)?;
        self.dispatcher.submit(order.id, order.total).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pipeline::PaymentPipeline;
    use crate::config::{PaymentConfig, RetrySettings};
    use crate::domain::ports::{OrderStore, PaymentGateway};
    use crate::infrastructure::in_memory::InMemoryOrderStore;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingGateway {
        calls: AtomicU32,
    }

    #[async_trait]
    impl PaymentGateway for CountingGateway {
        async fn charge(&self, _url: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn service_fixture() -> (
        Arc<InMemoryOrderStore>,
        Arc<CountingGateway>,
        OrderService,
        Arc<PaymentDispatcher>,
    ) {
        let store = Arc::new(InMemoryOrderStore::new());
        let gateway = Arc::new(CountingGateway {
            calls: AtomicU32::new(0),
        });
        let mut config = PaymentConfig::new("http://gateway/success", "http://gateway/failure");
        config.retry = RetrySettings {
            max_redeliveries: 0,
            redelivery_delay_ms: 1,
            backoff_multiplier: 2.0,
        };
        let pipeline = PaymentPipeline::new(config, gateway.clone(), store.clone());
        let dispatcher = Arc::new(PaymentDispatcher::start(pipeline, 1));
        let service = OrderService::new(store.clone(), dispatcher.clone());
        (store, gateway, service, dispatcher)
    }

    /// Drops the service and drains the worker pool so any queued pipeline
    /// run has finished before assertions.
    async fn drain(service: OrderService, dispatcher: Arc<PaymentDispatcher>) {
        drop(service);
        Arc::into_inner(dispatcher)
            .expect("dispatcher still shared")
            .shutdown()
            .await;
    }

    fn sample_items() -> Vec<OrderItem> {
        vec![
            OrderItem::new("SKU-1", 2, dec!(49.90)).unwrap(),
            OrderItem::new("SKU-2", 1, dec!(149.90)).unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_create_computes_total_and_persists() {
        let (store, _gateway, service, _dispatcher) = service_fixture();
        let order = service.create("cust-1", sample_items()).await.unwrap();

        assert_eq!(order.total, dec!(249.70));
        assert_eq!(order.status, OrderStatus::New);
        assert!(store.get(order.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let (_store, _gateway, service, _dispatcher) = service_fixture();
        assert!(matches!(
            service.get(OrderId::new()).await,
            Err(PaymentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (store, _gateway, service, _dispatcher) = service_fixture();
        let order = service.create("cust-1", sample_items()).await.unwrap();
        let mut paid = service.create("cust-2", sample_items()).await.unwrap();
        paid.status = OrderStatus::Paid;
        store.save(paid).await.unwrap();

        let new_orders = service.list(Some(OrderStatus::New)).await.unwrap();
        assert_eq!(new_orders.len(), 1);
        assert_eq!(new_orders[0].id, order.id);
        assert_eq!(service.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_items_recomputes_total() {
        let (_store, _gateway, service, _dispatcher) = service_fixture();
        let order = service.create("cust-1", sample_items()).await.unwrap();

        let updated = service
            .update_items(
                order.id,
                vec![OrderItem::new("SKU-3", 2, dec!(5.00)).unwrap()],
            )
            .await
            .unwrap();
        assert_eq!(updated.total, dec!(10.00));
    }

    #[tokio::test]
    async fn test_update_items_rejected_on_settled_order() {
        let (store, _gateway, service, _dispatcher) = service_fixture();
        let mut order = service.create("cust-1", sample_items()).await.unwrap();
        order.status = OrderStatus::Paid;
        let order = store.save(order).await.unwrap();

        let result = service
            .update_items(
                order.id,
                vec![OrderItem::new("SKU-3", 1, dec!(1.00)).unwrap()],
            )
            .await;
        assert!(matches!(result, Err(PaymentError::InvalidState { .. })));

        let stored = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.total, dec!(249.70));
        assert_eq!(stored.items.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_only_while_new() {
        let (store, _gateway, service, _dispatcher) = service_fixture();
        let order = service.create("cust-1", sample_items()).await.unwrap();
        service.delete(order.id).await.unwrap();
        assert!(store.get(order.id).await.unwrap().is_none());

        let mut settled = service.create("cust-2", sample_items()).await.unwrap();
        settled.status = OrderStatus::FailedPayment;
        let settled = store.save(settled).await.unwrap();
        assert!(matches!(
            service.delete(settled.id).await,
            Err(PaymentError::InvalidState { .. })
        ));
        assert!(store.get(settled.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_dispatch_rejected_unless_new() {
        let (store, gateway, service, dispatcher) = service_fixture();
        let mut order = service.create("cust-1", sample_items()).await.unwrap();
        order.status = OrderStatus::Paid;
        let order = store.save(order).await.unwrap();

        let result = service.dispatch_payment(order.id).await;
        assert!(matches!(result, Err(PaymentError::InvalidState { .. })));

        // Drain the pool: if a message had been queued, it would have been
        // processed by now.
        drain(service, dispatcher).await;
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_order_is_not_found() {
        let (_store, _gateway, service, _dispatcher) = service_fixture();
        assert!(matches!(
            service.dispatch_payment(OrderId::new()).await,
            Err(PaymentError::NotFound(_))
        ));
    }
}
