//! Resilience utilities for the HTTP transport
//!
//! Provides timeout, retry, and circuit breaker patterns. Only the transport
//! uses these; the entity engine itself never retries.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default max retries for transient failures
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default circuit breaker failure threshold
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

/// Default circuit breaker cooldown period
pub const DEFAULT_COOLDOWN_SECS: u64 = 600; // 10 minutes

/// Resilience configuration for a transport
#[derive(Debug, Clone)]
pub struct ResilienceConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum retry attempts for transient failures
    pub max_retries: u32,
    /// Base delay for exponential backoff (doubles each retry)
    pub retry_base_delay_ms: u64,
    /// Number of consecutive failures before circuit opens
    pub failure_threshold: u32,
    /// How long circuit stays open before allowing retry
    pub cooldown_secs: u64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: 1000,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
        }
    }
}

impl ResilienceConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get retry delay for attempt N (exponential backoff)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let delay_ms = self.retry_base_delay_ms * (1 << attempt.min(6)); // cap at 64x
        Duration::from_millis(delay_ms)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Circuit breaker state
#[derive(Debug)]
pub struct CircuitBreaker {
    /// Connector name for logging
    name: String,
    /// Consecutive failure count
    failures: AtomicU32,
    /// Unix seconds when circuit opened (0 = closed)
    opened_at: AtomicU64,
    cooldown_secs: u64,
    failure_threshold: u32,
}

impl CircuitBreaker {
    /// Create a new circuit breaker
    pub fn new(name: impl Into<String>, config: &ResilienceConfig) -> Self {
        Self {
            name: name.into(),
            failures: AtomicU32::new(0),
            opened_at: AtomicU64::new(0),
            cooldown_secs: config.cooldown_secs,
            failure_threshold: config.failure_threshold.max(1),
        }
    }

    /// Check if requests should be blocked
    ///
    /// Once the cooldown has passed the breaker lets requests through again
    /// (half-open); the next success closes it.
    pub fn is_open(&self) -> bool {
        let opened_at = self.opened_at.load(Ordering::Relaxed);
        if opened_at == 0 {
            return false;
        }
        now_secs().saturating_sub(opened_at) < self.cooldown_secs
    }

    /// Record a successful request
    pub fn record_success(&self) {
        let prev_failures = self.failures.swap(0, Ordering::Relaxed);
        let was_open = self.opened_at.swap(0, Ordering::Relaxed) > 0;

        if was_open {
            debug!(
                connector = %self.name,
                prev_failures,
                "circuit breaker closed after successful request"
            );
        }
    }

    /// Record a failed request, returns true if circuit just opened
    pub fn record_failure(&self) -> bool {
        let failures = self.failures.fetch_add(1, Ordering::Relaxed) + 1;

        if failures >= self.failure_threshold
            && self
                .opened_at
                .compare_exchange(0, now_secs().max(1), Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
        {
            warn!(
                connector = %self.name,
                failures,
                cooldown_secs = self.cooldown_secs,
                "circuit breaker opened after consecutive failures"
            );
            return true;
        }
        false
    }

    /// Get current failure count
    pub fn failure_count(&self) -> u32 {
        self.failures.load(Ordering::Relaxed)
    }
}

/// Determines if a transport error is worth retrying
pub fn is_retryable_error(error: &reqwest::Error) -> bool {
    if error.is_timeout() || error.is_connect() {
        return true;
    }

    if let Some(status) = error.status() {
        return is_retryable_status(status.as_u16());
    }

    false
}

/// Server errors (5xx) and rate limits (429)
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Execute an operation with timeout, retry and circuit breaker
///
/// `should_retry` inspects each outcome. A retryable `Ok` (say, a 503
/// response) is retried, and if it is still retryable on the last attempt it
/// is handed back as `Ok` so the caller can look at the final response. A
/// non-retryable `Err` is returned at once as [`RetryError::Permanent`].
pub async fn execute_with_retry<F, Fut, T, E, P>(
    config: &ResilienceConfig,
    circuit: Option<&CircuitBreaker>,
    operation_name: &str,
    should_retry: P,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&Result<T, E>) -> bool,
{
    if let Some(cb) = circuit
        && cb.is_open()
    {
        return Err(RetryError::CircuitOpen);
    }

    let attempts = config.max_retries + 1;
    let mut last_error = None;

    for attempt in 0..attempts {
        if attempt > 0 {
            let delay = config.retry_delay(attempt - 1);
            debug!(
                operation = operation_name,
                attempt,
                delay_ms = delay.as_millis(),
                "retrying after delay"
            );
            tokio::time::sleep(delay).await;
        }

        let is_last = attempt + 1 == attempts;

        match timeout(config.timeout(), operation()).await {
            Ok(outcome) => {
                if !should_retry(&outcome) {
                    return match outcome {
                        Ok(value) => {
                            if let Some(cb) = circuit {
                                cb.record_success();
                            }
                            Ok(value)
                        }
                        Err(e) => Err(RetryError::Permanent(e)),
                    };
                }

                if is_last {
                    if let Some(cb) = circuit {
                        cb.record_failure();
                    }
                    return match outcome {
                        Ok(value) => Ok(value),
                        Err(e) => Err(RetryError::Exhausted {
                            attempts,
                            last_error: e.to_string(),
                        }),
                    };
                }

                if let Err(e) = &outcome {
                    last_error = Some(e.to_string());
                }
                debug!(
                    operation = operation_name,
                    attempt,
                    error = last_error.as_deref().unwrap_or("retryable response"),
                    "request failed, will retry"
                );
            }
            Err(_) => {
                last_error = Some("request timed out".to_string());
                debug!(
                    operation = operation_name,
                    attempt,
                    timeout_secs = config.timeout_secs,
                    "request timed out"
                );
            }
        }
    }

    // Only reachable when the last attempt timed out
    if let Some(cb) = circuit {
        cb.record_failure();
    }

    Err(RetryError::Exhausted {
        attempts,
        last_error: last_error.unwrap_or_else(|| "unknown error".to_string()),
    })
}

/// Error from retry operation
#[derive(Debug)]
pub enum RetryError<E> {
    /// Circuit breaker is open
    CircuitOpen,
    /// All retry attempts exhausted
    Exhausted { attempts: u32, last_error: String },
    /// Non-retryable error
    Permanent(E),
}

impl<E: std::fmt::Display> std::fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryError::CircuitOpen => write!(f, "circuit breaker is open"),
            RetryError::Exhausted {
                attempts,
                last_error,
            } => {
                write!(f, "failed after {} attempts: {}", attempts, last_error)
            }
            RetryError::Permanent(e) => write!(f, "permanent error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config(max_retries: u32) -> ResilienceConfig {
        ResilienceConfig {
            max_retries,
            retry_base_delay_ms: 1,
            timeout_secs: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_retry_delay_backoff() {
        let config = ResilienceConfig::default();
        assert_eq!(config.retry_delay(0), Duration::from_millis(1000));
        assert_eq!(config.retry_delay(1), Duration::from_millis(2000));
        assert_eq!(config.retry_delay(10), Duration::from_millis(64000));
    }

    #[test]
    fn test_retryable_status() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(200));
    }

    #[test]
    fn test_circuit_breaker_opens_after_threshold() {
        let config = ResilienceConfig {
            failure_threshold: 2,
            ..Default::default()
        };
        let cb = CircuitBreaker::new("box", &config);
        assert!(!cb.record_failure());
        assert!(!cb.is_open());
        assert!(cb.record_failure());
        assert!(cb.is_open());
        assert!(!cb.record_failure());

        cb.record_success();
        assert!(!cb.is_open());
        assert_eq!(cb.failure_count(), 0);
    }

    #[test]
    fn test_circuit_breaker_half_open_after_cooldown() {
        let config = ResilienceConfig {
            failure_threshold: 1,
            cooldown_secs: 0,
            ..Default::default()
        };
        let cb = CircuitBreaker::new("box", &config);
        assert!(cb.record_failure());
        assert!(!cb.is_open());
    }

    #[tokio::test]
    async fn test_retry_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<u32, RetryError<String>> = execute_with_retry(
            &fast_config(3),
            None,
            "test",
            |outcome: &Result<u32, String>| outcome.is_err(),
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 { Err(format!("fail {n}")) } else { Ok(n) }
            },
        )
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retryable_ok_returned_after_exhaustion() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<u16, RetryError<String>> = execute_with_retry(
            &fast_config(2),
            None,
            "test",
            |outcome: &Result<u16, String>| matches!(outcome, Ok(s) if is_retryable_status(*s)),
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(503)
            },
        )
        .await;
        assert_eq!(result.unwrap(), 503);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<u32, RetryError<String>> = execute_with_retry(
            &fast_config(3),
            None,
            "test",
            |_: &Result<u32, String>| false,
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("bad request".to_string())
            },
        )
        .await;
        assert!(matches!(result, Err(RetryError::Permanent(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_opens_circuit() {
        let config = ResilienceConfig {
            failure_threshold: 1,
            ..fast_config(1)
        };
        let cb = CircuitBreaker::new("zendesk", &config);
        let result: Result<u32, RetryError<String>> = execute_with_retry(
            &config,
            Some(&cb),
            "test",
            |outcome: &Result<u32, String>| outcome.is_err(),
            || async { Err("connection refused".to_string()) },
        )
        .await;
        match result {
            Err(RetryError::Exhausted {
                attempts,
                last_error,
            }) => {
                assert_eq!(attempts, 2);
                assert!(last_error.contains("connection refused"));
            }
            other => panic!("unexpected: {other:?}"),
        }

        let blocked: Result<u32, RetryError<String>> = execute_with_retry(
            &config,
            Some(&cb),
            "test",
            |_: &Result<u32, String>| false,
            || async { Ok(1) },
        )
        .await;
        assert!(matches!(blocked, Err(RetryError::CircuitOpen)));
    }
}
