use std::sync::Arc;

use tracing::{debug, trace};

use super::queue::{Record, WorkQueue};
use crate::callback::Callback;
use crate::error::RecordError;
use crate::events::EventHandler;
use crate::retry::RetryPolicy;

/// Per-worker counters, merged into the run summary once the worker exits.
pub(crate) struct Tally<T> {
    pub succeeded: usize,
    pub attempts: usize,
    pub failures: usize,
    pub exhausted: Vec<T>,
}

impl<T> Default for Tally<T> {
    fn default() -> Self {
        Self {
            succeeded: 0,
            attempts: 0,
            failures: 0,
            exhausted: Vec::new(),
        }
    }
}

/// One worker loop. Pulls records until it finds the queue empty.
pub(crate) struct Worker<T, C, H> {
    pub id: usize,
    pub queue: Arc<WorkQueue<T>>,
    pub callback: Arc<C>,
    pub handler: Arc<H>,
    pub policy: RetryPolicy,
}

impl<T, C, H> Worker<T, C, H>
where
    T: Clone + Send + 'static,
    C: Callback<T>,
    H: EventHandler<T, C::Error>,
{
    pub async fn run(self) -> Tally<T> {
        let mut tally = Tally::default();

        while let Some(record) = self.queue.pop() {
            self.process(record, &mut tally).await;
        }

        debug!(
            worker = self.id,
            attempts = tally.attempts,
            "Queue empty, worker exiting"
        );
        tally
    }

    async fn process(&self, record: Record<T>, tally: &mut Tally<T>) {
        tokio::time::sleep(record.delay).await;

        // Without a listening handler no id or message is ever built.
        let record_id = self
            .handler
            .enabled()
            .then(|| self.handler.record_id(&record.value));
        if let Some(id) = &record_id {
            self.handler.on_info(&format!("Processing record '{}'.", id));
        }

        let attempt = record.try_count.saturating_add(1);
        trace!(worker = self.id, record = record_id.as_deref(), attempt, "Invoking callback");
        tally.attempts += 1;

        match self.callback.call(record.value.clone()).await {
            Ok(_) => {
                tally.succeeded += 1;
                if let Some(id) = &record_id {
                    self.handler
                        .on_info(&format!("Record '{}' processed successfully.", id));
                }
            }
            Err(error) => {
                tally.failures += 1;

                match self.policy.delay_for_attempt(attempt) {
                    Some(wait) => {
                        debug!(
                            worker = self.id,
                            record = record_id.as_deref(),
                            attempt,
                            delay_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                            "Attempt failed, re-enqueueing"
                        );
                        if let Some(record_id) = record_id {
                            self.handler.on_error(&RecordError::Retrying {
                                record_id,
                                error,
                                wait,
                            });
                        }
                        self.queue.push(record.retry(wait));
                        trace!(worker = self.id, queued = self.queue.len(), "Record re-enqueued");
                    }
                    None => {
                        debug!(
                            worker = self.id,
                            record = record_id.as_deref(),
                            attempts = attempt,
                            "Attempt ceiling reached, dropping record"
                        );
                        if let Some(record_id) = record_id {
                            self.handler.on_error(&RecordError::Exhausted {
                                record_id,
                                error,
                                attempts: attempt,
                            });
                        }
                        tally.exhausted.push(record.value);
                    }
                }
            }
        }
    }
}
