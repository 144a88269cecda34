use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, sleep_until, Instant};

use crate::error::FetchError;

const USER_AGENT_VALUE: &str = "Solar-Dashboard/1.0";

#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Minimum spacing between two requests to the same URL.
    pub min_interval: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Attempt `n` failing sleeps `backoff_base * 2^n` before the next one.
    pub backoff_base: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(1000),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

/// Rate-limited, retrying JSON fetcher shared by every upstream feed.
pub struct FetchGateway {
    http: Client,
    policy: FetchPolicy,
    last_request: Mutex<HashMap<String, Instant>>,
}

impl FetchGateway {
    pub fn new(http: Client, policy: FetchPolicy) -> Self {
        Self {
            http,
            policy,
            last_request: Mutex::new(HashMap::new()),
        }
    }

    pub async fn fetch_json(&self, url: &str) -> Result<JsonValue, FetchError> {
        self.fetch_with_retry(url, self.policy.max_retries).await
    }

    pub async fn fetch_with_retry(
        &self,
        url: &str,
        max_retries: u32,
    ) -> Result<JsonValue, FetchError> {
        let attempts = max_retries.max(1);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            self.wait_for_slot(url).await;
            match self.fetch_once(url).await {
                Ok(payload) => return Ok(payload),
                Err(err) => {
                    tracing::warn!(url, attempt, error = %err, "upstream fetch attempt failed");
                    if attempt >= attempts {
                        return Err(FetchError::Exhausted {
                            url: url.to_string(),
                            attempts,
                            last: Box::new(err),
                        });
                    }
                    sleep(self.backoff_delay(attempt)).await;
                }
            }
        }
    }

    pub(crate) fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.policy.backoff_base.saturating_mul(factor)
    }

    /// Reserves the next request slot for `url` and sleeps until it opens.
    /// Slots whose interval has already elapsed are dropped on the way in.
    /// The lock is released before sleeping so other URLs are never held up.
    async fn wait_for_slot(&self, url: &str) {
        let slot = {
            let mut last_request = self.last_request.lock().await;
            let now = Instant::now();
            let min_interval = self.policy.min_interval;
            last_request.retain(|_, reserved| *reserved + min_interval > now);
            let slot = match last_request.get(url) {
                Some(previous) => (*previous + self.policy.min_interval).max(now),
                None => now,
            };
            last_request.insert(url.to_string(), slot);
            slot
        };
        if slot > Instant::now() {
            tracing::debug!(url, "rate limiting upstream request");
            sleep_until(slot).await;
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<JsonValue, FetchError> {
        let response = self
            .http
            .get(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, "application/json")
            .timeout(self.policy.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        response
            .json::<JsonValue>()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))
    }
}
