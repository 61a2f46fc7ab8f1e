//! Retry logic with exponential backoff

use std::time::Duration;
use anyhow::Result;
use tracing::warn;
use crate::errors::{BotError, BotResult};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub exponential_base: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 800,
            max_delay_ms: 5000,
            exponential_base: 2.0,
        }
    }
}

/// True for failures worth another attempt: the request never reached the
/// server.
pub fn is_connection_error(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<reqwest::Error>())
        .any(|e| e.is_connect())
}

/// Runs `operation` until it succeeds, `should_retry` rejects the error, or
/// the attempts run out.
pub async fn retry_with_backoff<F, Fut, T, P>(
    operation: F,
    config: &RetryConfig,
    context: &str,
    should_retry: P,
) -> BotResult<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
    P: Fn(&anyhow::Error) -> bool,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay_ms;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt >= config.max_attempts || !should_retry(&e) => {
                return Err(BotError::Network {
                    message: format!("{} failed after {} attempt(s)", context, attempt),
                    source: Some(e),
                    retry_count: attempt,
                });
            }
            Err(e) => {
                warn!(
                    "Attempt {}/{} failed for {}: {}. Retrying in {}ms...",
                    attempt, config.max_attempts, context, e, delay
                );

                tokio::time::sleep(Duration::from_millis(delay)).await;

                delay = (delay as f64 * config.exponential_base) as u64;
                delay = delay.min(config.max_delay_ms);
                // +/- 5% jitter
                let jitter = delay as f64 * 0.1 * (rand::random::<f64>() - 0.5);
                delay = (delay as f64 + jitter).max(0.0) as u64;
            }
        }
    }
}
