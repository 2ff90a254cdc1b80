//! Retry logic with exponential backoff
//!
//! Every upstream call is wrapped in [`with_retry`]: a failed attempt is
//! followed by a wait, the wait is multiplied by the configured factor, and
//! the attempt is repeated until the attempt budget is spent.
//!
//! # Example
//!
//! ```no_run
//! use nexy_tasks::clock::TokioClock;
//! use nexy_tasks::config::RetryConfig;
//! use nexy_tasks::error::Error;
//! use nexy_tasks::retry::with_retry;
//!
//! # async fn example() -> Result<(), Error> {
//! let config = RetryConfig::default();
//! let body = with_retry(&config, &TokioClock, "GET /client/user", || async {
//!     Ok::<_, Error>("{}".to_string())
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use crate::clock::Clock;
use crate::config::RetryConfig;
use crate::error::Error;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // Any transport failure: connect, timeout, TLS, proxy handshake
            Error::Network(_) => true,
            // Non-2xx answers are retried too; callers inspect the last one
            Error::Status { .. } => true,
            Error::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::NotConnected
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::Interrupted
            ),
            Error::Config { .. } => false,
            Error::IncompleteData(_) => false,
            Error::InvalidStatus(_) => false,
            Error::UnsupportedProxy(_) => false,
            Error::Serialization(_) => false,
            Error::Other(_) => false,
        }
    }
}

/// Execute an async operation with exponential backoff retry logic
///
/// # Arguments
///
/// * `config` - Attempt budget, initial delay, multiplier, cap and jitter
/// * `clock` - Where the backoff waits happen
/// * `label` - Human-readable name of the operation for log lines
/// * `operation` - Async closure returning `Result<T, E>`
///
/// # Returns
///
/// The first successful result, or the last error once `config.max_attempts`
/// attempts have been made (or a non-retryable error occurred).
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    clock: &dyn Clock,
    label: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt: u32 = 1;
    let mut delay = config.initial_delay;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::debug!(operation = label, attempts = attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                tracing::warn!(
                    operation = label,
                    error = %e,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying {} ({}/{})",
                    label,
                    attempt,
                    max_attempts
                );

                let wait = if config.jitter {
                    add_jitter(delay, config.max_delay.max(delay))
                } else {
                    delay
                };
                clock.sleep(wait).await;

                attempt += 1;
                delay = next_delay(config, delay);
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::debug!(
                        operation = label,
                        error = %e,
                        attempts = attempt,
                        "Operation failed after all retry attempts exhausted"
                    );
                } else {
                    tracing::debug!(operation = label, error = %e, "Operation failed with non-retryable error");
                }
                return Err(e);
            }
        }
    }
}

/// Delay that follows `delay` under the configured multiplier and cap
///
/// Saturates at `config.max_delay`, including when the product is too large
/// to be a `Duration`.
pub fn next_delay(config: &RetryConfig, delay: Duration) -> Duration {
    scale(delay, config.backoff_multiplier, config.max_delay)
}

/// Add random jitter to a delay
///
/// The actual delay will be between `delay` and `2 * delay`, never above `cap`.
fn add_jitter(delay: Duration, cap: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    scale(delay, 1.0 + jitter_factor, cap)
}

fn scale(delay: Duration, factor: f64, cap: Duration) -> Duration {
    Duration::try_from_secs_f64(delay.as_secs_f64() * factor)
        .unwrap_or(cap)
        .min(cap)
}
