use payflow::application::dispatcher::PaymentDispatcher;
use payflow::application::pipeline::PaymentPipeline;
use payflow::application::service::OrderService;
use payflow::config::{PaymentConfig, RetrySettings};
use payflow::domain::order::{OrderId, OrderItem};
use payflow::domain::ports::OrderStore;
use payflow::infrastructure::http_gateway::HttpPaymentGateway;
use payflow::infrastructure::in_memory::InMemoryOrderStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

pub struct TestStack {
    pub store: Arc<InMemoryOrderStore>,
    pub service: OrderService,
    dispatcher: Arc<PaymentDispatcher>,
}

/// Wires the full settlement stack against real HTTP endpoints with fast
/// retry timings (1 ms initial delay, 3 redeliveries).
pub fn stack(success_url: &str, failure_url: &str) -> TestStack {
    let mut config = PaymentConfig::new(success_url, failure_url);
    config.retry = RetrySettings {
        max_redeliveries: 3,
        redelivery_delay_ms: 1,
        backoff_multiplier: 2.0,
    };
    config.request_timeout_ms = 2_000;

    let store = Arc::new(InMemoryOrderStore::new());
    let gateway = Arc::new(HttpPaymentGateway::new(config.request_timeout()).unwrap());
    let pipeline = PaymentPipeline::new(config, gateway, store.clone());
    let dispatcher = Arc::new(PaymentDispatcher::start(pipeline, 4));
    let service = OrderService::new(store.clone(), dispatcher.clone());

    TestStack {
        store,
        service,
        dispatcher,
    }
}

impl TestStack {
    /// Closes the queue and waits for every in-flight pipeline run.
    pub async fn shutdown(self) {
        let TestStack {
            service,
            dispatcher,
            ..
        } = self;
        drop(service);
        Arc::into_inner(dispatcher)
            .expect("dispatcher still shared")
            .shutdown()
            .await;
    }
}

pub fn single_item(unit_price: Decimal) -> Vec<OrderItem> {
    vec![OrderItem::new("SKU-1", 1, unit_price).unwrap()]
}

pub async fn wait_until_settled(store: &InMemoryOrderStore, id: OrderId) {
    for _ in 0..1_000 {
        if let Some(order) = store.get(id).await.unwrap()
            && order.status.is_terminal()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("order {id} never settled");
}
