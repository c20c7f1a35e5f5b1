use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy for connection attempts
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Ceiling for the exponentially growing delay
    pub max_delay: Duration,

    /// Whether to randomize each delay to avoid synchronized reconnects
    pub use_jitter: bool,
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }
}

impl Default for RetryConfig {
    /// 5 attempts, 200ms initial delay, 10s ceiling, jitter enabled
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            use_jitter: true,
        }
    }
}

/// Retry an async operation with exponential backoff.
///
/// The delay doubles after every failed attempt, capped at
/// `config.max_delay`. The final error is returned unchanged once
/// `config.max_attempts` is exhausted.
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use database::common::{retry_with_backoff, RetryConfig};
///
/// let config = RetryConfig::new().with_max_attempts(10);
/// let db = retry_with_backoff(|| postgres::connect(&url), config).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delay = config.initial_delay;

    for attempt in 1..=config.max_attempts {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("Operation succeeded on attempt {}", attempt);
                }
                return Ok(result);
            }
            Err(e) if attempt == config.max_attempts => {
                warn!("Operation failed after {} attempts: {}", attempt, e);
                return Err(e);
            }
            Err(e) => {
                let sleep_for = if config.use_jitter {
                    apply_jitter(delay)
                } else {
                    delay
                };

                debug!(
                    "Operation failed (attempt {}/{}): {}. Retrying in {:?}...",
                    attempt, config.max_attempts, e, sleep_for
                );

                tokio::time::sleep(sleep_for).await;
                delay = (delay * 2).min(config.max_delay);
            }
        }
    }

    unreachable!("max_attempts is at least 1")
}

/// Randomize a delay to between 50% and 100% of its value.
fn apply_jitter(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;

    delay.mul_f64(factor)
}

/// Retry with the default policy.
pub async fn retry<F, Fut, T, E>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_backoff(operation, RetryConfig::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry(|| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>("success")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_failures() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let config = RetryConfig::new()
            .with_initial_delay(Duration::from_millis(10))
            .without_jitter();

        let result = retry_with_backoff(
            || {
                let counter = counter_clone.clone();
                async move {
                    let count = counter.fetch_add(1, Ordering::SeqCst);
                    if count < 2 {
                        Err(format!("attempt {}", count + 1))
                    } else {
                        Ok("success")
                    }
                }
            },
            config,
        )
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_attempts_exhausted() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let config = RetryConfig::new()
            .with_max_attempts(3)
            .with_initial_delay(Duration::from_millis(10))
            .without_jitter();

        let result = retry_with_backoff(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<String, _>("always fails")
                }
            },
            config,
        )
        .await;

        assert_eq!(result.unwrap_err(), "always fails");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_retry_config_builder() {
        let config = RetryConfig::new()
            .with_max_attempts(7)
            .with_initial_delay(Duration::from_millis(50))
            .with_max_delay(Duration::from_secs(2))
            .without_jitter();

        assert_eq!(config.max_attempts, 7);
        assert_eq!(config.initial_delay, Duration::from_millis(50));
        assert_eq!(config.max_delay, Duration::from_secs(2));
        assert!(!config.use_jitter);
    }

    #[test]
    fn test_apply_jitter_stays_in_range() {
        let delay = Duration::from_millis(1000);
        for _ in 0..10 {
            let jittered = apply_jitter(delay);
            assert!(jittered >= Duration::from_millis(500));
            assert!(jittered <= Duration::from_millis(1000));
        }
    }
}
