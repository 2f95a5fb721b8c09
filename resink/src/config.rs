use backoff::strategy::exponential::Exponential;

const DEFAULT_INITIAL_RETRY_INTERVAL_IN_MS: u32 = 1;
const DEFAULT_MAX_RETRY_INTERVAL_IN_MS: u32 = 10_000;
const DEFAULT_RETRY_FACTOR: f64 = 2.0;
const DEFAULT_RETRY_JITTER: f64 = 0.0;

/// Backoff applied by the drain task between failed flush/connect attempts.
///
/// The drain loop retries forever; these knobs only shape how long it cools
/// off between attempts. A successful `write` from a producer is never
/// delayed by this policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub initial_retry_interval_in_ms: u32,
    pub max_retry_interval_in_ms: u32,
    pub retry_factor: f64,
    pub retry_jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_retry_interval_in_ms: DEFAULT_INITIAL_RETRY_INTERVAL_IN_MS,
            max_retry_interval_in_ms: DEFAULT_MAX_RETRY_INTERVAL_IN_MS,
            retry_factor: DEFAULT_RETRY_FACTOR,
            retry_jitter: DEFAULT_RETRY_JITTER,
        }
    }
}

impl RetryConfig {
    /// Unbounded backoff iterator; the drain task never gives up on its own.
    pub(crate) fn backoff(&self) -> Exponential {
        Exponential::from_millis(
            self.initial_retry_interval_in_ms,
            self.max_retry_interval_in_ms,
            self.retry_factor,
            self.retry_jitter,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_backoff_grows_and_never_exhausts() {
        let mut backoff = RetryConfig::default().backoff();
        assert_eq!(backoff.next(), Some(Duration::from_millis(1)));
        assert_eq!(backoff.next(), Some(Duration::from_millis(2)));
        assert_eq!(backoff.next(), Some(Duration::from_millis(4)));
        for _ in 0..100 {
            assert!(backoff.next().is_some());
        }
    }
}
