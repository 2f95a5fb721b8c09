//! Backoff strategies for retry loops.
//!
//! A strategy is a plain `Iterator<Item = Duration>` producing the cool-off
//! period before each retry attempt. Retry loops compose a strategy with a
//! sleep of their choosing:
//!
//! ```
//! use std::time::Duration;
//! use backoff::strategy::fixed;
//!
//! let mut intervals = fixed::Interval::from_millis(10).take(3);
//! assert_eq!(intervals.next(), Some(Duration::from_millis(10)));
//! ```
//!
//! Bounding the number of attempts is either built into the strategy (see
//! [`strategy::exponential::Exponential`]) or done with `Iterator::take`.

pub mod strategy;
