//! Runner configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Tunables for a [`TaskRunner`](crate::TaskRunner).
///
/// Every field is optional when deserializing; missing fields take their
/// default.
///
/// ```rust,ignore
/// let config: RunnerConfig = serde_json::from_str(r#"{ "concurrent_tasks": 8 }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Number of worker loops draining the queue. Defaults to 2.
    pub concurrent_tasks: usize,
    /// Base wait in seconds before every attempt. Defaults to 1.
    pub retry_after_seconds: f64,
    /// Extra wait per failed attempt, in milliseconds. Defaults to 100.
    pub retry_delay_step_milliseconds: u64,
    /// Attempts per record before giving up. Defaults to unbounded.
    pub max_attempts: Option<u32>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            concurrent_tasks: 2,
            retry_after_seconds: 1.0,
            retry_delay_step_milliseconds: 100,
            max_attempts: None,
        }
    }
}

impl RunnerConfig {
    /// Check the configuration for values the runner cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrent_tasks == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        self.retry_after()?;
        if self.max_attempts == Some(0) {
            return Err(ConfigError::ZeroMaxAttempts);
        }
        Ok(())
    }

    /// `retry_after_seconds` as a [`Duration`].
    ///
    /// Fails for negative, non-finite or out-of-range values.
    pub fn retry_after(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.retry_after_seconds)
            .map_err(|_| ConfigError::InvalidRetryAfter(self.retry_after_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RunnerConfig::default();
        assert_eq!(config.concurrent_tasks, 2);
        assert_eq!(config.retry_after_seconds, 1.0);
        assert_eq!(config.retry_delay_step_milliseconds, 100);
        assert_eq!(config.max_attempts, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: RunnerConfig =
            serde_json::from_str(r#"{ "concurrent_tasks": 8, "max_attempts": 3 }"#).unwrap();

        assert_eq!(config.concurrent_tasks, 8);
        assert_eq!(config.max_attempts, Some(3));
        assert_eq!(config.retry_after_seconds, 1.0);
        assert_eq!(config.retry_delay_step_milliseconds, 100);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = RunnerConfig {
            concurrent_tasks: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroConcurrency));
    }

    #[test]
    fn test_negative_retry_after_rejected() {
        let config = RunnerConfig {
            retry_after_seconds: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRetryAfter(v)) if v == -1.0
        ));

        let config = RunnerConfig {
            retry_after_seconds: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_retry_after_rejected() {
        let config = RunnerConfig {
            retry_after_seconds: 1e20,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidRetryAfter(1e20)));

        let config: RunnerConfig =
            serde_json::from_str(r#"{ "retry_after_seconds": 1e20 }"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRetryAfter(_))
        ));

        let config = RunnerConfig {
            retry_after_seconds: f64::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_after_duration() {
        let config = RunnerConfig {
            retry_after_seconds: 0.25,
            ..Default::default()
        };
        assert_eq!(config.retry_after(), Ok(Duration::from_millis(250)));
    }

    #[test]
    fn test_zero_max_attempts_rejected() {
        let config = RunnerConfig {
            max_attempts: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxAttempts));
    }
}
