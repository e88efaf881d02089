//! Progress notifications emitted while a run drains its queue.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::RecordError;

/// Hooks the runner calls as records are processed.
///
/// Only `record_id` is required. The runner never stores state in the
/// handler; it only calls these methods, possibly from several workers at
/// once.
pub trait EventHandler<T, E>: Send + Sync {
    /// Human-readable identifier used in every message about `value`.
    fn record_id(&self, value: &T) -> String;

    /// Informational progress message.
    fn on_info(&self, _text: &str) {}

    /// Called on every failed attempt.
    fn on_error(&self, _error: &RecordError<E>) {}

    /// Whether the runner should build events at all.
    ///
    /// When `false`, no hook (including `record_id`) is called.
    fn enabled(&self) -> bool {
        true
    }
}

/// A handler that discards all events.
///
/// Used when the runner is built without an event handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventHandler;

impl<T, E> EventHandler<T, E> for NoopEventHandler {
    fn record_id(&self, _value: &T) -> String {
        String::new()
    }

    fn enabled(&self) -> bool {
        false
    }
}

impl<T, E, H> EventHandler<T, E> for Arc<H>
where
    H: EventHandler<T, E> + ?Sized,
{
    fn record_id(&self, value: &T) -> String {
        (**self).record_id(value)
    }

    fn on_info(&self, text: &str) {
        (**self).on_info(text)
    }

    fn on_error(&self, error: &RecordError<E>) {
        (**self).on_error(error)
    }

    fn enabled(&self) -> bool {
        (**self).enabled()
    }
}

/// Trait for types that can identify themselves in log messages.
pub trait HasEntityId {
    /// Returns the entity identifier for this value.
    fn entity_id(&self) -> String;
}

impl HasEntityId for String {
    fn entity_id(&self) -> String {
        self.clone()
    }
}

impl HasEntityId for &str {
    fn entity_id(&self) -> String {
        self.to_string()
    }
}

macro_rules! entity_id_via_display {
    ($($ty:ty),*) => {
        $(impl HasEntityId for $ty {
            fn entity_id(&self) -> String {
                self.to_string()
            }
        })*
    };
}

entity_id_via_display!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Forwards events to `tracing`.
///
/// Info messages are logged at `INFO`, retried failures at `WARN` and
/// exhausted records at `ERROR`, all under the `async_task_runner::events`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventHandler;

impl<T, E> EventHandler<T, E> for TracingEventHandler
where
    T: HasEntityId,
    E: fmt::Display,
{
    fn record_id(&self, value: &T) -> String {
        value.entity_id()
    }

    fn on_info(&self, text: &str) {
        info!(target: "async_task_runner::events", "{}", text);
    }

    fn on_error(&self, err: &RecordError<E>) {
        match err {
            RecordError::Retrying { record_id, wait, .. } => warn!(
                target: "async_task_runner::events",
                record = %record_id,
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "{}",
                err
            ),
            RecordError::Exhausted {
                record_id,
                attempts,
                ..
            } => error!(
                target: "async_task_runner::events",
                record = %record_id,
                attempts = *attempts,
                "{}",
                err
            ),
        }
    }
}

type IdFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;
type InfoFn = Box<dyn Fn(&str) + Send + Sync>;
type ErrorFn<E> = Box<dyn Fn(&RecordError<E>) + Send + Sync>;

/// An event handler assembled from closures.
///
/// `on_info` and `on_error` are independently optional; a hook that was
/// never set is simply not called.
///
/// ```rust,ignore
/// let handler = FnEventHandler::new(|s: &String| s.clone())
///     .with_error_hook(|e: &RecordError<anyhow::Error>| eprintln!("{e}"));
/// ```
pub struct FnEventHandler<T, E> {
    record_id: IdFn<T>,
    on_info: Option<InfoFn>,
    on_error: Option<ErrorFn<E>>,
}

impl<T, E> FnEventHandler<T, E> {
    /// Create a handler with only an identifier function.
    pub fn new<F>(record_id: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            record_id: Box::new(record_id),
            on_info: None,
            on_error: None,
        }
    }

    /// Set the informational hook.
    pub fn with_info_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_info = Some(Box::new(f));
        self
    }

    /// Set the failure hook.
    pub fn with_error_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(&RecordError<E>) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }
}

impl<T, E> EventHandler<T, E> for FnEventHandler<T, E> {
    fn record_id(&self, value: &T) -> String {
        (self.record_id)(value)
    }

    fn on_info(&self, text: &str) {
        if let Some(f) = &self.on_info {
            f(text);
        }
    }

    fn on_error(&self, err: &RecordError<E>) {
        if let Some(f) = &self.on_error {
            f(err);
        }
    }
}

impl<T, E> fmt::Debug for FnEventHandler<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEventHandler")
            .field("on_info", &self.on_info.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
