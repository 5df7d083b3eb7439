use super::outcome::OutcomeHandler;
use super::retry::RetryPolicy;
use crate::config::PaymentConfig;
use crate::domain::order::OrderId;
use crate::domain::ports::{OrderStoreArc, PaymentGatewayArc};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;

/// One payment message; lives only for the duration of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub amount: Decimal,
}

/// Per-message settlement sequence: validate, select the target endpoint by
/// amount, probe it under the retry policy, and apply the outcome.
///
/// Holds no cross-message mutable state besides the order store. Errors never
/// escape `process`; whatever cannot be settled is logged and dropped.
pub struct PaymentPipeline {
    config: PaymentConfig,
    gateway: PaymentGatewayArc,
    outcome: OutcomeHandler,
    retry: RetryPolicy,
}

impl PaymentPipeline {
    pub fn new(config: PaymentConfig, gateway: PaymentGatewayArc, store: OrderStoreArc) -> Self {
        let retry = RetryPolicy::new(&config.retry);
        let outcome = OutcomeHandler::new(store);
        Self {
            config,
            gateway,
            outcome,
            retry,
        }
    }

    /// Amounts above 1000 route to the failure endpoint, 1000 and below to
    /// the success endpoint. The threshold is a simulation hook and must stay
    /// exactly here.
    fn select_url(&self, amount: Decimal) -> &str {
        if amount > Decimal::ONE_THOUSAND {
            &self.config.failure_url
        } else {
            &self.config.success_url
        }
    }

    fn validate(request: &PaymentRequest) -> Result<()> {
        if request.amount < Decimal::ZERO {
            return Err(PaymentError::Validation(format!(
                "payment amount {} is negative",
                request.amount
            )));
        }
        Ok(())
    }

    /// Runs the full settlement sequence for one message.
    pub async fn process(&self, request: PaymentRequest) {
        let order_id = request.order_id;

        if let Err(e) = Self::validate(&request) {
            // No dead-letter path: the message is dropped and the order
            // stays NEW. Callers observe it by reading the order.
            tracing::error!(%order_id, error = %e, "dropping invalid payment message");
            return;
        }

        let url = self.select_url(request.amount);
        tracing::info!(%order_id, amount = %request.amount, url, "processing payment");

        let charge = self.retry.run(|| self.gateway.charge(url)).await;
        let settled = match charge {
            Ok(()) => self.outcome.mark_paid(order_id).await,
            Err(e) => {
                tracing::warn!(%order_id, error = %e, "payment failed after retries");
                self.outcome.mark_failed(order_id).await
            }
        };

        match settled {
            Ok(order) => {
                tracing::info!(%order_id, status = %order.status, "order settled");
            }
            // Already settled or gone; nothing to retry, nothing to surface.
            Err(e) => {
                tracing::warn!(%order_id, error = %e, "settlement not applied");
            }
        }
    }
}
