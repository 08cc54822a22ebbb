//! Exponential backoff with jitter between retry attempts.

use rand::Rng;
use std::time::Duration;

/// Base interval of the backoff curve.
pub const BACKOFF_INTERVAL: Duration = Duration::from_millis(250);

/// Retry bound and backoff base shared by all calls of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Highest attempt index that may still be retried. Default: 5,
    /// so a request is tried at most 6 times.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: BACKOFF_INTERVAL,
        }
    }
}

impl RetryPolicy {
    /// Random delay before retrying after attempt `attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let unit: f64 = rand::rng().random_range(0.0..=1.0);
        self.delay_with_unit(attempt, unit)
    }

    /// Delay for a given position in the jitter window.
    ///
    /// `unit` in `[0, 1]` maps to `[0.5, 1.5] * 2^attempt * base_delay`,
    /// rounded up to a whole millisecond.
    pub fn delay_with_unit(&self, attempt: u32, unit: f64) -> Duration {
        let base_ms = self.base_delay.as_millis() as f64 * 2f64.powi(attempt.min(30) as i32);
        let jitter = (unit.clamp(0.0, 1.0) - 0.5) * base_ms;
        Duration::from_millis((base_ms + jitter).ceil() as u64)
    }
}
