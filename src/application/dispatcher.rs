use super::pipeline::{PaymentPipeline, PaymentRequest};
use crate::domain::order::OrderId;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// Pending payment messages the queue will buffer before `submit` applies
/// backpressure.
const QUEUE_CAPACITY: usize = 64;

/// Accepts payment requests and runs them through the pipeline on a fixed
/// pool of workers, capping concurrent gateway calls.
///
/// `submit` is fire-and-forget: it returns once the message is queued,
/// without waiting for settlement, and performs no deduplication. Callers
/// must have confirmed the order is still NEW; duplicate submits are resolved
/// by the store's conditional write, not here.
pub struct PaymentDispatcher {
    sender: mpsc::Sender<PaymentRequest>,
    workers: Vec<JoinHandle<()>>,
}

impl PaymentDispatcher {
    /// Spawns `workers` pipeline workers draining a bounded queue.
    pub fn start(pipeline: PaymentPipeline, workers: usize) -> Self {
        let pipeline = Arc::new(pipeline);
        let (sender, receiver) = mpsc::channel::<PaymentRequest>(QUEUE_CAPACITY);
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..workers.max(1))
            .map(|worker| {
                let pipeline = pipeline.clone();
                let receiver = receiver.clone();
                tokio::spawn(async move {
                    loop {
                        let request = receiver.lock().await.recv().await;
                        match request {
                            Some(request) => pipeline.process(request).await,
                            None => break,
                        }
                    }
                    tracing::debug!(worker, "payment worker stopped");
                })
            })
            .collect();

        Self { sender, workers }
    }

    /// Queues a payment message for asynchronous settlement.
    ///
    /// Returns as soon as the message is handed to the pipeline; the
    /// settlement outcome is only observable through a later read of the
    /// order.
    pub async fn submit(&self, order_id: OrderId, amount: Decimal) -> Result<()> {
        self.sender
            .send(PaymentRequest { order_id, amount })
            .await
            .map_err(|_| PaymentError::DispatcherClosed)
    }

    /// Closes the queue and waits for in-flight pipeline runs to finish.
    /// Retry timers run to completion; nothing is cancelled.
    pub async fn shutdown(self) {
        drop(self.sender);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}
