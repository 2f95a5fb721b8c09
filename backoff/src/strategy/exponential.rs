use std::time::Duration;

use rand::Rng;

/// Exponentially growing retry intervals with an upper cap and optional
/// jitter.
///
/// Attempt `i` (1-based) sleeps for `base * factor^(i-1)`, randomized by
/// `jitter` and clamped to `max_interval`. With `max_attempts = None` the
/// iterator never runs dry, which is what perpetual reconnect loops want.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use backoff::strategy::exponential::Exponential;
///
/// let mut backoff = Exponential::from_millis(100, 5_000, 2.0, 0.0, None);
/// assert_eq!(backoff.next(), Some(Duration::from_millis(100)));
/// assert_eq!(backoff.next(), Some(Duration::from_millis(200)));
/// backoff.reset();
/// assert_eq!(backoff.next(), Some(Duration::from_millis(100)));
/// ```
pub struct Exponential {
    base_interval: Duration,
    /// Cap applied after growth and jitter.
    max_interval: Duration,
    factor: f64,
    /// Randomization factor in `[0.0, 1.0]`; each delay is scaled by a value
    /// drawn uniformly from `[1 - jitter, 1 + jitter]`.
    jitter: f64,
    /// `None` retries without bound.
    max_attempts: Option<u16>,
    attempt: u16,
}

impl Exponential {
    pub fn new(
        base_interval: Duration,
        max_interval: Duration,
        factor: f64,
        jitter: f64,
        max_attempts: Option<u16>,
    ) -> Self {
        Self {
            base_interval,
            max_interval,
            factor,
            jitter,
            max_attempts,
            attempt: 0,
        }
    }

    pub fn from_millis(
        base_interval_ms: u32,
        max_interval_ms: u32,
        factor: f64,
        jitter: f64,
        max_attempts: Option<u16>,
    ) -> Self {
        Self::new(
            Duration::from_millis(u64::from(base_interval_ms)),
            Duration::from_millis(u64::from(max_interval_ms)),
            factor,
            jitter,
            max_attempts,
        )
    }

    /// Starts the growth over from the base interval. Call after a successful
    /// attempt so the next failure backs off from scratch.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Number of intervals handed out since construction or the last
    /// [`reset`](Self::reset).
    pub fn current_attempt(&self) -> u16 {
        self.attempt
    }

    fn delay_for(&self, attempt: u16) -> Duration {
        // attempt is 1-based by the time we get here; guard anyway so the
        // exponent never goes negative.
        let exponent = i32::from(attempt.max(1)) - 1;
        let raw_ms = (self.base_interval.as_millis() as f64) * self.factor.powi(exponent);

        let delay_ms = if self.jitter == 0.0 {
            raw_ms
        } else {
            let spread = rand::rng().random_range(1.0 - self.jitter..=1.0 + self.jitter);
            raw_ms * spread
        };

        Duration::from_millis(delay_ms as u64).min(self.max_interval)
    }
}

impl Iterator for Exponential {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(max_attempts) = self.max_attempts
            && self.attempt >= max_attempts
        {
            return None;
        }

        // saturate so an unbounded strategy survives arbitrarily many
        // consecutive failures; the delay is capped long before this matters
        self.attempt = self.attempt.saturating_add(1);
        Some(self.delay_for(self.attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_without_jitter() {
        let mut backoff = Exponential::from_millis(50, 60_000, 2.0, 0.0, None);
        let delays: Vec<_> = backoff.by_ref().take(4).collect();
        assert_eq!(
            delays,
            [50, 100, 200, 400]
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn caps_at_max_interval() {
        let mut backoff = Exponential::from_millis(100, 250, 2.0, 0.0, None);
        assert_eq!(backoff.next(), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next(), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next(), Some(Duration::from_millis(250)));
        assert_eq!(backoff.next(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn exhausts_after_max_attempts() {
        let mut backoff = Exponential::from_millis(10, 1_000, 2.0, 0.0, Some(2));
        assert!(backoff.next().is_some());
        assert!(backoff.next().is_some());
        assert_eq!(backoff.next(), None);
    }

    #[test]
    fn unbounded_when_attempts_unset() {
        let mut backoff = Exponential::from_millis(1, 10, 2.0, 0.0, None);
        for _ in 0..1_000 {
            assert!(backoff.next().is_some());
        }
    }

    #[test]
    fn attempt_counter_saturates_past_u16_max() {
        let mut backoff = Exponential::from_millis(1, 10, 2.0, 0.0, None);
        for _ in 0..(u32::from(u16::MAX) + 10) {
            assert!(backoff.next().is_some());
        }
        assert_eq!(backoff.current_attempt(), u16::MAX);
        assert_eq!(backoff.next(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn reset_restarts_growth() {
        let mut backoff = Exponential::from_millis(100, 10_000, 2.0, 0.0, None);
        assert!(backoff.next().is_some());
        assert!(backoff.next().is_some());
        assert_eq!(backoff.current_attempt(), 2);

        backoff.reset();
        assert_eq!(backoff.current_attempt(), 0);
        assert_eq!(backoff.next(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let mut backoff = Exponential::from_millis(100, 10_000, 2.0, 0.5, None);
        for expected_ms in [100u64, 200, 400] {
            let delay = backoff.next().unwrap();
            assert!(delay >= Duration::from_millis(expected_ms / 2));
            assert!(delay <= Duration::from_millis(expected_ms * 3 / 2));
        }
    }
}
