use crate::domain::ports::PaymentGateway;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Payment endpoint probe over HTTP.
///
/// Issues a GET to the selected URL; any 2xx response counts as a successful
/// settlement signal. Non-2xx statuses, transport failures and the
/// per-attempt timeout all classify as retryable gateway errors.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
}

impl HttpPaymentGateway {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn charge(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(format!("GET {url}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(PaymentError::Gateway(format!(
                "GET {url} returned {status}"
            )))
        }
    }
}
