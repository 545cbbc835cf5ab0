/*!
 * Consumer Worker
 * Takes a fixed number of items from a shared buffer and processes each one
 */

use super::types::{pause, StateHandle, WorkerReport, WorkerRole, WorkerState};
use crate::core::sync::{BoundedBuffer, CancellationToken};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

type Processor<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Consumer worker
///
/// The processor sees each item once, after it has left the buffer.
pub struct Consumer<T> {
    id: u32,
    name: String,
    quota: u64,
    delay: Option<Duration>,
    processor: Processor<T>,
    state: StateHandle,
}

impl<T> Consumer<T>
where
    T: Send + Debug + 'static,
{
    /// Consumer that logs every item at debug level
    pub fn new(id: u32, quota: u64) -> Self {
        let log_name = format!("Consumer-{}", id);
        Self::with_processor(id, quota, move |item: &T| {
            debug!(worker = %log_name, item = ?item, "Processing item");
        })
    }
}

impl<T> Consumer<T>
where
    T: Send,
{
    pub fn with_processor<F>(id: u32, quota: u64, processor: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self {
            id,
            name: format!("Consumer-{}", id),
            quota,
            delay: None,
            processor: Arc::new(processor),
            state: StateHandle::new(),
        }
    }

    /// Pause between two consumptions (not after the last one)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = (!delay.is_zero()).then_some(delay);
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quota(&self) -> u64 {
        self.quota
    }

    pub fn state(&self) -> WorkerState {
        self.state.get()
    }

    /// Handle for observing the state from another thread
    pub fn state_handle(&self) -> StateHandle {
        self.state.clone()
    }

    /// Consume until the quota is met or `cancel` fires
    pub fn run<B>(&self, buffer: &B, cancel: &CancellationToken) -> WorkerReport
    where
        B: BoundedBuffer<T> + ?Sized,
    {
        self.state.set(WorkerState::Running);
        info!(worker = %self.name, quota = self.quota, "Starting consumption");

        let mut completed = 0;
        for sequence in 1..=self.quota {
            if cancel.is_cancelled() {
                return self.cancelled(completed);
            }

            if buffer.is_empty() {
                self.state.set(WorkerState::Blocked);
                debug!(worker = %self.name, sequence, "Waiting, buffer empty");
            }

            let item = match buffer.take(cancel) {
                Ok(item) => item,
                Err(err) => {
                    warn!(worker = %self.name, error = %err, "Take aborted");
                    return self.cancelled(completed);
                }
            };
            self.state.set(WorkerState::Running);

            (self.processor)(&item);
            completed += 1;

            if sequence < self.quota {
                if let Some(delay) = self.delay {
                    if !pause(delay, cancel) {
                        return self.cancelled(completed);
                    }
                }
            }
        }

        self.state.set(WorkerState::Done);
        info!(worker = %self.name, consumed = completed, "Finished consumption");
        self.report(completed)
    }

    fn cancelled(&self, completed: u64) -> WorkerReport {
        self.state.set(WorkerState::Cancelled);
        warn!(worker = %self.name, consumed = completed, "Consumption cancelled");
        self.report(completed)
    }

    fn report(&self, completed: u64) -> WorkerReport {
        WorkerReport {
            name: self.name.clone(),
            role: WorkerRole::Consumer,
            quota: self.quota,
            completed,
            state: self.state.get(),
        }
    }
}
