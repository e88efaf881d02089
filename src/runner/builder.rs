use std::sync::Arc;

use super::TaskRunner;
use crate::config::RunnerConfig;
use crate::error::ConfigError;
use crate::events::NoopEventHandler;
use crate::jitter::{JitterSource, RandomJitter};
use crate::retry::RetryPolicy;

/// Builder for configuring a [`TaskRunner`].
pub struct RunnerBuilder<C, H = NoopEventHandler> {
    callback: C,
    handler: H,
    config: RunnerConfig,
    jitter: Arc<dyn JitterSource>,
}

impl<C> RunnerBuilder<C, NoopEventHandler> {
    /// Create a new builder around the given callback, with default settings
    /// and no event handler.
    pub fn new(callback: C) -> Self {
        Self {
            callback,
            handler: NoopEventHandler,
            config: RunnerConfig::default(),
            jitter: Arc::new(RandomJitter),
        }
    }
}

impl<C, H> RunnerBuilder<C, H> {
    /// Replace all tunables at once.
    pub fn config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of concurrent worker loops.
    pub fn concurrent_tasks(mut self, n: usize) -> Self {
        self.config.concurrent_tasks = n;
        self
    }

    /// Set the base wait, in seconds, added to every attempt.
    pub fn retry_after_seconds(mut self, seconds: f64) -> Self {
        self.config.retry_after_seconds = seconds;
        self
    }

    /// Set the extra wait per failed attempt, in milliseconds.
    pub fn retry_delay_step_milliseconds(mut self, millis: u64) -> Self {
        self.config.retry_delay_step_milliseconds = millis;
        self
    }

    /// Give up on a record after `n` attempts.
    ///
    /// Without this, a record that never succeeds keeps the run alive forever.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.max_attempts = Some(n);
        self
    }

    /// Set the source of initial-delay jitter.
    pub fn with_jitter<J: JitterSource + 'static>(mut self, jitter: J) -> Self {
        self.jitter = Arc::new(jitter);
        self
    }

    /// Set the event handler.
    pub fn with_event_handler<H2>(self, handler: H2) -> RunnerBuilder<C, H2> {
        RunnerBuilder {
            callback: self.callback,
            handler,
            config: self.config,
            jitter: self.jitter,
        }
    }

    /// Build the runner.
    pub fn build(self) -> Result<TaskRunner<C, H>, ConfigError> {
        self.config.validate()?;

        Ok(TaskRunner {
            callback: Arc::new(self.callback),
            handler: Arc::new(self.handler),
            policy: RetryPolicy::from(&self.config),
            concurrent_tasks: self.config.concurrent_tasks,
            jitter: self.jitter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn noop(_record: u32) -> Result<(), ()> {
        Ok(())
    }

    #[test]
    fn test_defaults() {
        let runner = RunnerBuilder::new(noop).build().unwrap();

        assert_eq!(runner.concurrent_tasks(), 2);
        assert_eq!(runner.policy(), &RetryPolicy::default());
    }

    #[test]
    fn test_setters_override_config() {
        let runner = RunnerBuilder::new(noop)
            .config(RunnerConfig {
                concurrent_tasks: 8,
                ..Default::default()
            })
            .concurrent_tasks(3)
            .retry_after_seconds(0.25)
            .retry_delay_step_milliseconds(10)
            .max_attempts(4)
            .build()
            .unwrap();

        assert_eq!(runner.concurrent_tasks(), 3);
        assert_eq!(runner.policy().retry_after, Duration::from_millis(250));
        assert_eq!(runner.policy().step, Duration::from_millis(10));
        assert_eq!(runner.policy().max_attempts, Some(4));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = RunnerBuilder::new(noop).concurrent_tasks(0).build();
        assert!(matches!(result, Err(ConfigError::ZeroConcurrency)));

        let result = RunnerBuilder::new(noop).retry_after_seconds(-0.5).build();
        assert!(matches!(result, Err(ConfigError::InvalidRetryAfter(_))));
    }

    #[test]
    fn test_out_of_range_retry_after_rejected_without_panic() {
        let result = RunnerBuilder::new(noop).retry_after_seconds(1e20).build();
        assert!(matches!(result, Err(ConfigError::InvalidRetryAfter(v)) if v == 1e20));

        let result = RunnerBuilder::new(noop)
            .config(serde_json::from_str(r#"{ "retry_after_seconds": 1e20 }"#).unwrap())
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidRetryAfter(_))));
    }
}
