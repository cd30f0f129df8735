//! Retry Module
//!
//! Bounded retry helper for fallible async operations.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::config::Config;

// == Public Constants ==
/// Default maximum number of attempts
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay between attempts in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 250;

// == Retry Policy ==
/// Bounded retry with a fixed delay between attempts.
///
/// Every call makes at least one attempt. The delay is applied between
/// attempts, never after the last one, and errors are returned to the
/// caller unchanged once the attempt bound is reached.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (at least 1)
    max_attempts: u32,
    /// Delay between attempts
    delay: Duration,
}

impl RetryPolicy {
    // == Constructor ==
    /// Creates a policy with the given bounds.
    ///
    /// `max_attempts` is clamped to a minimum of 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Creates a policy from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.retry_max_attempts,
            Duration::from_millis(config.retry_delay_ms),
        )
    }

    /// Maximum number of attempts this policy makes.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    // == Run ==
    /// Runs `op` until it succeeds or the attempt bound is reached.
    ///
    /// Returns the first `Ok`, or the last error once attempts are
    /// exhausted. Each failed attempt is logged before the delay.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts => {
                    warn!(
                        "attempt {}/{} failed: {}, retrying in {:?}",
                        attempt, self.max_attempts, err, self.delay
                    );
                    sleep(self.delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::from_millis(DEFAULT_DELAY_MS))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> = quick(3)
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok(n) }
            })
            .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_recovers_after_failures() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> = quick(3)
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err(format!("transient failure {}", n))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausts_attempts() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> = quick(3)
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(format!("failure {}", n)) }
            })
            .await;

        // The last error wins
        assert_eq!(result.unwrap_err(), "failure 3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_zero_attempts_clamped_to_one() {
        let policy = quick(0);
        assert_eq!(policy.max_attempts(), 1);

        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("always".to_string()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retry_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(policy.delay(), Duration::from_millis(DEFAULT_DELAY_MS));
    }
}
