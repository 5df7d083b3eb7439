use serde::Deserialize;
use std::time::Duration;

/// Immutable settlement configuration, passed into the pipeline at
/// construction.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Endpoint probed for amounts up to and including the threshold.
    pub success_url: String,
    /// Endpoint probed for amounts above the threshold.
    pub failure_url: String,
    #[serde(default)]
    pub retry: RetrySettings,
    /// Number of pipeline workers; caps concurrent gateway calls.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Per-attempt cap on a single gateway call.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// Retries after the initial attempt; total attempts = this + 1.
    #[serde(default = "default_max_redeliveries")]
    pub max_redeliveries: u32,
    /// Delay before the first retry.
    #[serde(default = "default_redelivery_delay_ms")]
    pub redelivery_delay_ms: u64,
    /// Multiplier applied to the delay on each further retry.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_redeliveries: default_max_redeliveries(),
            redelivery_delay_ms: default_redelivery_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl PaymentConfig {
    pub fn new(success_url: impl Into<String>, failure_url: impl Into<String>) -> Self {
        Self {
            success_url: success_url.into(),
            failure_url: failure_url.into(),
            retry: RetrySettings::default(),
            workers: default_workers(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_max_redeliveries() -> u32 {
    3
}

fn default_redelivery_delay_ms() -> u64 {
    200
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_workers() -> usize {
    4
}

fn default_request_timeout_ms() -> u64 {
    5_000
}
