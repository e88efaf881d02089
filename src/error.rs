//! Error types reported by the runner.

use std::time::Duration;

use thiserror::Error;

/// A failed attempt at processing a record, as reported to
/// [`EventHandler::on_error`](crate::EventHandler::on_error).
///
/// Wraps the callback's own error together with the record identifier.
#[derive(Error, Debug)]
pub enum RecordError<E> {
    /// The record was re-enqueued and will be attempted again after `wait`.
    #[error(
        "Processing record '{record_id}' resulted in error {error} Wait for {wait_secs} seconds.",
        wait_secs = .wait.as_secs_f64()
    )]
    Retrying {
        record_id: String,
        error: E,
        wait: Duration,
    },

    /// The record reached the configured attempt ceiling and was dropped.
    #[error("Processing record '{record_id}' failed after {attempts} attempts: {error}")]
    Exhausted {
        record_id: String,
        error: E,
        attempts: u32,
    },
}

impl<E> RecordError<E> {
    /// Identifier of the record that failed.
    pub fn record_id(&self) -> &str {
        match self {
            Self::Retrying { record_id, .. } | Self::Exhausted { record_id, .. } => record_id,
        }
    }

    /// The error returned by the callback.
    pub fn error(&self) -> &E {
        match self {
            Self::Retrying { error, .. } | Self::Exhausted { error, .. } => error,
        }
    }

    /// Consume this error, returning the callback's error.
    pub fn into_error(self) -> E {
        match self {
            Self::Retrying { error, .. } | Self::Exhausted { error, .. } => error,
        }
    }

    /// Wait before the next attempt, if the record will be retried.
    pub fn wait(&self) -> Option<Duration> {
        match self {
            Self::Retrying { wait, .. } => Some(*wait),
            Self::Exhausted { .. } => None,
        }
    }

    /// Returns true if the record will be attempted again.
    pub fn is_retrying(&self) -> bool {
        matches!(self, Self::Retrying { .. })
    }
}

/// Error returned when building a runner from invalid settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("concurrent_tasks must be at least 1")]
    ZeroConcurrency,

    #[error("retry_after_seconds must be a non-negative number of seconds within Duration range, got {0}")]
    InvalidRetryAfter(f64),

    #[error("max_attempts must be at least 1 when set")]
    ZeroMaxAttempts,
}
