use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use payflow::application::dispatcher::PaymentDispatcher;
use payflow::application::pipeline::PaymentPipeline;
use payflow::application::service::OrderService;
use payflow::config::{PaymentConfig, RetrySettings};
use payflow::domain::order::OrderItem;
use payflow::infrastructure::http_gateway::HttpPaymentGateway;
use payflow::infrastructure::in_memory::InMemoryOrderStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// Creates an order, settles its payment against the configured endpoints
/// and prints the final status.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Endpoint probed for amounts up to 1000
    #[arg(long)]
    success_url: String,

    /// Endpoint probed for amounts above 1000
    #[arg(long)]
    failure_url: String,

    /// Order amount (one line item priced at this value)
    #[arg(long, default_value = "500")]
    amount: Decimal,

    /// Retries after the initial attempt
    #[arg(long, default_value_t = 3)]
    max_redeliveries: u32,

    /// Delay before the first retry, in milliseconds
    #[arg(long, default_value_t = 200)]
    redelivery_delay_ms: u64,

    /// Backoff multiplier applied per retry
    #[arg(long, default_value_t = 2.0)]
    backoff_multiplier: f64,

    /// Pipeline worker count
    #[arg(long, default_value_t = 4)]
    workers: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payflow=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = PaymentConfig::new(cli.success_url, cli.failure_url);
    config.retry = RetrySettings {
        max_redeliveries: cli.max_redeliveries,
        redelivery_delay_ms: cli.redelivery_delay_ms,
        backoff_multiplier: cli.backoff_multiplier,
    };
    config.workers = cli.workers;

    let store = Arc::new(InMemoryOrderStore::new());
    let gateway = Arc::new(HttpPaymentGateway::new(config.request_timeout()).into_diagnostic()?);
    let pipeline = PaymentPipeline::new(config.clone(), gateway, store.clone());
    let dispatcher = Arc::new(PaymentDispatcher::start(pipeline, config.workers));
    let service = OrderService::new(store, dispatcher.clone());

    let order = service
        .create(
            "demo-customer",
            vec![OrderItem::new("DEMO-SKU", 1, cli.amount).into_diagnostic()?],
        )
        .await
        .into_diagnostic()?;
    println!("created order {} with total {}", order.id, order.total);

    service.dispatch_payment(order.id).await.into_diagnostic()?;
    println!("payment dispatched, waiting for settlement");

    // Settlement is observable only by reading the order back.
    let settled = loop {
        let current = service.get(order.id).await.into_diagnostic()?;
        if current.status.is_terminal() {
            break current;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    };
    println!("order {} settled: {}", settled.id, settled.status);

    drop(service);
    match Arc::into_inner(dispatcher) {
        Some(dispatcher) => dispatcher.shutdown().await,
        None => return Err(miette!("dispatcher still shared at shutdown")),
    }

    Ok(())
}
