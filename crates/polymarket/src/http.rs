//! Shared rate-limited GET helper with retry.

use crate::error::{PolymarketError, Result};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Retry behavior for transient request failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Base delay before the first retry.
    pub base_delay: Duration,
    /// Ceiling on the backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay for the given zero-based attempt, with jitter in
    /// `[0.5x, 1.5x]` to avoid thundering retries.
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = f64::from(2u32.saturating_pow(attempt.min(16)));
        let exp = (self.base_delay.as_secs_f64() * factor).min(self.max_delay.as_secs_f64());
        let jitter = 0.5 + rand::random::<f64>();
        Duration::from_secs_f64(exp * jitter)
    }
}

/// Rate-limited REST client shared by the Gamma, Data API, and CLOB
/// wrappers.
pub(crate) struct RestClient {
    http: Client,
    base_url: String,
    rate_limiter: Arc<DirectLimiter>,
    retry: RetryPolicy,
}

impl RestClient {
    /// Creates a client for a base URL with a requests-per-minute quota.
    pub(crate) fn new(base_url: impl Into<String>, requests_per_minute: NonZeroU32) -> Self {
        let quota = Quota::per_minute(requests_per_minute);
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            retry: RetryPolicy::default(),
        }
    }

    pub(crate) fn set_base_url(&mut self, url: impl Into<String>) {
        self.base_url = url.into();
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn set_retry(&mut self, retry: RetryPolicy) {
        self.retry = retry;
    }

    /// Waits for the rate limit and GETs a JSON value, retrying transient
    /// failures with exponential backoff.
    pub(crate) async fn get_value(&self, path: &str) -> Result<JsonValue> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt: u32 = 0;

        loop {
            self.rate_limiter.until_ready().await;
            tracing::debug!("GET {}", url);

            match self.try_get(&url).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt + 1 < self.retry.max_attempts => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        url = %url,
                        attempt = attempt + 1,
                        max_attempts = self.retry.max_attempts,
                        error = %e,
                        "Request failed, retrying in {:.2}s",
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_get(&self, url: &str) -> Result<JsonValue> {
        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(PolymarketError::api(status, text));
        }

        Ok(response.json::<JsonValue>().await?)
    }
}
