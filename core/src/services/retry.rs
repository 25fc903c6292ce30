//! Fixed-delay retry policy shared by the handshake and balance calls

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Default number of attempts for retried provider calls
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// "Up to `max_attempts` tries, `delay` apart"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Every attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `attempt` until it succeeds or the budget is spent. The attempt
    /// number (1-based) is passed in for logging.
    pub async fn run<T, E, F, Fut>(
        &self,
        operation: &'static str,
        attempt: F,
    ) -> Result<T, RetryExhausted<E>>
    where
        E: fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_while(operation, |_| true, attempt).await
    }

    /// Like `run`, but gives up at the first error `retryable` rejects
    pub async fn run_while<T, E, F, Fut, R>(
        &self,
        operation: &'static str,
        retryable: R,
        mut attempt: F,
    ) -> Result<T, RetryExhausted<E>>
    where
        E: fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut current = 1;

        loop {
            match attempt(current).await {
                Ok(value) => {
                    if current > 1 {
                        tracing::debug!(operation, attempt = current, "Provider call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    tracing::warn!(
                        operation,
                        attempt = current,
                        max_attempts,
                        error = %error,
                        "Provider call failed"
                    );

                    if current >= max_attempts || !retryable(&error) {
                        return Err(RetryExhausted {
                            attempts: current,
                            last_error: error,
                        });
                    }

                    tokio::time::sleep(self.delay).await;
                    current += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let started = tokio::time::Instant::now();

        let result: Result<u32, RetryExhausted<String>> = policy
            .run("test", |n| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 3 {
                        Err(format!("failure {}", n))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two pauses between three attempts
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_keeps_last_error() {
        let policy = RetryPolicy::new(3, Duration::from_millis(10));

        let result: Result<(), RetryExhausted<String>> = policy
            .run("test", |n| async move { Err(format!("failure {}", n)) })
            .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last_error, "failure 3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_stops_early() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let started = tokio::time::Instant::now();

        let result: Result<(), RetryExhausted<String>> = policy
            .run_while(
                "test",
                |err: &String| !err.starts_with("fatal"),
                |n| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if n == 1 {
                            Err("transient".to_string())
                        } else {
                            Err("fatal".to_string())
                        }
                    }
                },
            )
            .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 2);
        assert_eq!(exhausted.last_error, "fatal");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(0, Duration::ZERO);

        let result: Result<(), RetryExhausted<&str>> = policy
            .run("test", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("nope") }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
