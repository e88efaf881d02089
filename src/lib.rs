//! # async-task-runner
//!
//! Bounded-concurrency task runner with retry.
//!
//! Hand it a list of records and a fallible async callback. A fixed number of
//! workers drain the list; every record that fails is re-enqueued with a
//! longer delay, until every record has succeeded.
//!
//! ## Why async-task-runner?
//!
//! - **Bounded** - Never more than `concurrent_tasks` callbacks in flight
//! - **Persistent retries** - Failures are rescheduled with linear backoff, never dropped
//! - **Jittered start** - First attempts are spread across workers
//! - **Observable** - Optional event hooks, or plain `tracing` output
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use async_task_runner::{TaskRunner, TracingEventHandler};
//!
//! let runner = TaskRunner::builder(|url: String| async move { fetch(&url).await })
//!     .concurrent_tasks(4)
//!     .retry_after_seconds(1.0)
//!     .retry_delay_step_milliseconds(100)
//!     .with_event_handler(TracingEventHandler)
//!     .build()?;
//!
//! let summary = runner.run(urls).await;
//! ```
//!
//! ## Retry schedule
//!
//! A record's first attempt waits `retry_after_seconds` plus a random
//! multiple of 200ms below `concurrent_tasks * 200ms`. After its n-th failure
//! it waits `retry_after_seconds + n * retry_delay_step_milliseconds`.
//!
//! Retries are unbounded unless [`RunnerBuilder::max_attempts`] is set: a
//! record that never succeeds keeps the run going forever.

pub mod callback;
pub mod config;
pub mod error;
pub mod events;
pub mod jitter;
pub mod retry;
pub mod runner;

pub use callback::Callback;
pub use config::RunnerConfig;
pub use error::{ConfigError, RecordError};
pub use events::{EventHandler, FnEventHandler, HasEntityId, NoopEventHandler, TracingEventHandler};
pub use jitter::{FixedJitter, JitterSource, RandomJitter};
pub use retry::RetryPolicy;
pub use runner::{RunSummary, RunnerBuilder, TaskRunner};
