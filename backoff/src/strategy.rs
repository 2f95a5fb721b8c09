//! Interval strategies. Each strategy yields the delay to observe before the
//! next retry attempt.

pub mod exponential;
pub mod fixed;
