use std::time::Duration;

/// A fixed-interval strategy that yields the same delay for every retry
/// attempt, forever. Cap the attempts with `Iterator::take` if the loop is
/// not meant to retry indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    interval: Duration,
}

impl Interval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }
}

impl Iterator for Interval {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.interval)
    }
}
