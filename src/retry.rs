//! Retry delay schedule.

use std::time::Duration;

use crate::config::RunnerConfig;

/// Spacing between jitter slots for a record's first attempt.
pub const JITTER_STEP: Duration = Duration::from_millis(200);

/// Linear backoff schedule shared by every record of a run.
///
/// The first attempt of a record waits `retry_after` plus a jitter slot.
/// After the n-th failure the record waits `retry_after + n * step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Base wait added to every delay, including the first attempt.
    pub retry_after: Duration,
    /// Additional wait per failed attempt.
    pub step: Duration,
    /// Ceiling on attempts per record. `None` retries until success.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RunnerConfig::default())
    }
}

/// Out-of-range waits saturate: huge values become [`Duration::MAX`], negative
/// or NaN values become zero. [`RunnerConfig::validate`] rejects both.
impl From<&RunnerConfig> for RetryPolicy {
    fn from(config: &RunnerConfig) -> Self {
        let retry_after = config.retry_after().unwrap_or(
            if config.retry_after_seconds > 0.0 {
                Duration::MAX
            } else {
                Duration::ZERO
            },
        );

        Self {
            retry_after,
            step: Duration::from_millis(config.retry_delay_step_milliseconds),
            max_attempts: config.max_attempts,
        }
    }
}

impl RetryPolicy {
    /// Create an unbounded linear policy.
    pub fn linear(retry_after: Duration, step: Duration) -> Self {
        Self {
            retry_after,
            step,
            max_attempts: None,
        }
    }

    /// Stop retrying a record once it has been attempted `max_attempts` times.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Delay before a record's first attempt, given its jitter slot.
    pub fn initial_delay(&self, slot: u32) -> Duration {
        self.retry_after
            .saturating_add(JITTER_STEP.saturating_mul(slot))
    }

    /// Calculate the delay after `failures` failed attempts (1-indexed).
    ///
    /// Returns `None` if the attempt ceiling has been reached.
    pub fn delay_for_attempt(&self, failures: u32) -> Option<Duration> {
        match self.max_attempts {
            Some(max) if failures >= max => None,
            _ => Some(self.retry_after.saturating_add(self.step.saturating_mul(failures))),
        }
    }

    /// Returns `true` if records are retried until they succeed.
    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retry_after, Duration::from_secs(1));
        assert_eq!(policy.step, Duration::from_millis(100));
        assert!(policy.is_unbounded());
    }

    #[test]
    fn test_initial_delay_adds_jitter_slots() {
        let policy = RetryPolicy::linear(Duration::from_secs(1), Duration::from_millis(100));
        assert_eq!(policy.initial_delay(0), Duration::from_millis(1000));
        assert_eq!(policy.initial_delay(1), Duration::from_millis(1200));
        assert_eq!(policy.initial_delay(3), Duration::from_millis(1600));
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::linear(Duration::from_secs(1), Duration::from_millis(100));

        assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(1100)));
        assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_millis(1200)));
        assert_eq!(policy.delay_for_attempt(10), Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_backoff_is_monotonic() {
        let policy = RetryPolicy::linear(Duration::from_millis(250), Duration::from_millis(7));
        let delays: Vec<_> = (1..50).filter_map(|n| policy.delay_for_attempt(n)).collect();

        assert_eq!(delays.len(), 49);
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_zero_step_keeps_base_delay() {
        let policy = RetryPolicy::linear(Duration::from_secs(2), Duration::ZERO);
        assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_for_attempt(100), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_max_attempts_ceiling() {
        let policy = RetryPolicy::linear(Duration::from_secs(1), Duration::from_millis(100))
            .with_max_attempts(3);

        assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(1100)));
        assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_millis(1200)));
        assert_eq!(policy.delay_for_attempt(3), None);
        assert!(!policy.is_unbounded());
    }

    #[test]
    fn test_from_config() {
        let config = RunnerConfig {
            concurrent_tasks: 4,
            retry_after_seconds: 0.5,
            retry_delay_step_milliseconds: 20,
            max_attempts: Some(5),
        };
        let policy = RetryPolicy::from(&config);

        assert_eq!(policy.retry_after, Duration::from_millis(500));
        assert_eq!(policy.step, Duration::from_millis(20));
        assert_eq!(policy.max_attempts, Some(5));
    }

    #[test]
    fn test_from_unvalidated_config_saturates() {
        let huge = RunnerConfig {
            retry_after_seconds: 1e20,
            ..Default::default()
        };
        assert_eq!(RetryPolicy::from(&huge).retry_after, Duration::MAX);
        assert_eq!(
            RetryPolicy::from(&huge).delay_for_attempt(3),
            Some(Duration::MAX)
        );

        let negative = RunnerConfig {
            retry_after_seconds: -3.0,
            ..Default::default()
        };
        assert_eq!(RetryPolicy::from(&negative).retry_after, Duration::ZERO);
    }
}
