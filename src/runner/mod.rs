//! Bounded-concurrency runner with retry.

mod builder;
mod queue;
mod worker;

pub use builder::RunnerBuilder;

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::callback::Callback;
use crate::events::{EventHandler, NoopEventHandler};
use crate::jitter::JitterSource;
use crate::retry::RetryPolicy;
use queue::{Record, WorkQueue};
use worker::{Tally, Worker};

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary<T> {
    /// Records whose callback eventually returned `Ok`.
    pub succeeded: usize,
    /// Total callback invocations.
    pub attempts: usize,
    /// Invocations that returned `Err`.
    pub failures: usize,
    /// Records dropped after reaching the attempt ceiling.
    ///
    /// Always empty unless `max_attempts` was configured.
    pub exhausted: Vec<T>,
}

impl<T> Default for RunSummary<T> {
    fn default() -> Self {
        Self {
            succeeded: 0,
            attempts: 0,
            failures: 0,
            exhausted: Vec::new(),
        }
    }
}

impl<T> RunSummary<T> {
    /// Returns true if every record succeeded.
    pub fn is_complete(&self) -> bool {
        self.exhausted.is_empty()
    }

    fn merge(&mut self, tally: Tally<T>) {
        self.succeeded += tally.succeeded;
        self.attempts += tally.attempts;
        self.failures += tally.failures;
        self.exhausted.extend(tally.exhausted);
    }
}

/// Runs a callback over a list of records with a fixed number of workers,
/// retrying failed records with linear backoff.
pub struct TaskRunner<C, H = NoopEventHandler> {
    callback: Arc<C>,
    handler: Arc<H>,
    policy: RetryPolicy,
    concurrent_tasks: usize,
    jitter: Arc<dyn JitterSource>,
}

impl<C> TaskRunner<C, NoopEventHandler> {
    /// Start building a runner around `callback`.
    pub fn builder(callback: C) -> RunnerBuilder<C> {
        RunnerBuilder::new(callback)
    }
}

impl<C, H> TaskRunner<C, H> {
    /// The retry schedule used by this runner.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Number of worker loops per run.
    pub fn concurrent_tasks(&self) -> usize {
        self.concurrent_tasks
    }

    /// Process every record until it succeeds.
    ///
    /// Resolves once all workers have found the queue empty. Callback
    /// failures never fail the run; the record is re-enqueued instead. With
    /// no `max_attempts` configured, a record that never succeeds keeps this
    /// future pending forever.
    ///
    /// Workers are spawned onto the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Re-raises a panic from the callback or the event handler.
    pub async fn run<T>(&self, records: Vec<T>) -> RunSummary<T>
    where
        T: Clone + Send + 'static,
        C: Callback<T> + 'static,
        H: EventHandler<T, C::Error> + 'static,
    {
        let total = records.len();
        let slots = u32::try_from(self.concurrent_tasks).unwrap_or(u32::MAX);
        let queue = Arc::new(WorkQueue::new(records.into_iter().map(|value| {
            let delay = self.policy.initial_delay(self.jitter.slot(slots));
            Record::new(value, delay)
        })));

        info!(
            records = total,
            workers = self.concurrent_tasks,
            "Starting run"
        );

        let mut workers = JoinSet::new();
        for id in 0..self.concurrent_tasks {
            let worker = Worker {
                id,
                queue: queue.clone(),
                callback: self.callback.clone(),
                handler: self.handler.clone(),
                policy: self.policy,
            };
            workers.spawn(worker.run());
        }

        let mut summary = RunSummary::default();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(tally) => summary.merge(tally),
                Err(e) if e.is_panic() => {
                    error!(error = %e, "Worker panicked");
                    std::panic::resume_unwind(e.into_panic());
                }
                Err(e) => error!(error = %e, "Worker did not complete"),
            }
        }

        info!(
            succeeded = summary.succeeded,
            attempts = summary.attempts,
            failures = summary.failures,
            exhausted = summary.exhausted.len(),
            "Run complete"
        );
        summary
    }
}
