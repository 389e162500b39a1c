use std::time::Duration;

use serde_json::Value;
use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

use crate::error::FetchError;
use crate::webhook::{Transport, WebhookResponse};

/// Deadline and backoff schedule for the strategy webhook. The defaults are
/// sized for a slow generative backend, not a fast API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    pub initial_timeout: Duration,
    pub max_timeout: Duration,
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_timeout: Duration::from_secs(15 * 60),
            max_timeout: Duration::from_secs(20 * 60),
            backoff_base: Duration::from_millis(1000),
        }
    }
}

fn pow2(attempt: u32) -> u32 {
    1u32.checked_shl(attempt).unwrap_or(u32::MAX)
}

impl RetryPolicy {
    /// `min(initial * 2^attempt, max)`, attempt counted from 0.
    pub fn timeout_for(&self, attempt: u32) -> Duration {
        self.initial_timeout
            .saturating_mul(pow2(attempt))
            .min(self.max_timeout)
    }

    /// Pause taken after `attempt` failed, before the next one starts.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(pow2(attempt))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// One POST bounded by `limit`. On expiry the in-flight request is dropped.
pub async fn fetch_with_timeout<T: Transport>(
    transport: &T,
    url: &str,
    payload: &Value,
    limit: Duration,
) -> Result<WebhookResponse, FetchError> {
    match timeout(limit, transport.post_json(url, payload)).await {
        Ok(Ok(resp)) => Ok(resp),
        Ok(Err(e)) => Err(FetchError::Transport(e)),
        Err(_) => Err(FetchError::Timeout(limit)),
    }
}

/// Retries non-2xx responses and timeouts with exponential backoff.
///
/// Returns the first ok response, or the last failing response once attempts
/// run out. A timeout on the final attempt is returned as the error. Transport
/// errors are never retried.
pub async fn call_with_retry<T: Transport>(
    transport: &T,
    url: &str,
    payload: &Value,
    policy: &RetryPolicy,
) -> Result<WebhookResponse, FetchError> {
    let mut attempt: u32 = 0;
    loop {
        let limit = policy.timeout_for(attempt);
        info!(
            attempt = attempt + 1,
            max_attempts = policy.max_attempts(),
            timeout_ms = limit.as_millis() as u64,
            "webhook.attempt"
        );

        let exhausted = attempt >= policy.max_retries;
        match fetch_with_timeout(transport, url, payload, limit).await {
            Ok(resp) if resp.is_ok() => {
                info!(attempt = attempt + 1, status = resp.status, "webhook.ok");
                return Ok(resp);
            }
            Ok(resp) => {
                if exhausted {
                    warn!(attempt = attempt + 1, status = resp.status, "webhook.exhausted");
                    return Ok(resp);
                }
                warn!(attempt = attempt + 1, status = resp.status, "webhook.bad_status");
            }
            Err(FetchError::Timeout(after)) => {
                if exhausted {
                    warn!(attempt = attempt + 1, timeout_ms = after.as_millis() as u64, "webhook.exhausted");
                    return Err(FetchError::Timeout(after));
                }
                warn!(attempt = attempt + 1, timeout_ms = after.as_millis() as u64, "webhook.timeout");
            }
            Err(err) => {
                error!(attempt = attempt + 1, error = %err, "webhook.transport_error");
                return Err(err);
            }
        }

        let pause = policy.backoff_for(attempt);
        info!(backoff_ms = pause.as_millis() as u64, "webhook.backoff");
        sleep(pause).await;
        attempt += 1;
    }
}
