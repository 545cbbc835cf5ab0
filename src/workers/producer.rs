/*!
 * Producer Worker
 * Generates a fixed number of items and puts them into a shared buffer
 */

use super::types::{pause, StateHandle, WorkerReport, WorkerRole, WorkerState};
use crate::core::limits::ITEM_ID_STRIDE;
use crate::core::sync::{BoundedBuffer, CancellationToken};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

type Generator<T> = Arc<dyn Fn(u32, u64) -> T + Send + Sync>;

/// Default item: `id * 1000 + sequence`
pub fn default_item(id: u32, sequence: u64) -> u64 {
    u64::from(id) * ITEM_ID_STRIDE + sequence
}

/// Producer worker
///
/// Sequence numbers start at 1. The generated value depends only on the
/// producer id and the sequence number.
pub struct Producer<T> {
    id: u32,
    name: String,
    quota: u64,
    delay: Option<Duration>,
    generator: Generator<T>,
    state: StateHandle,
}

impl Producer<u64> {
    /// Producer of `default_item` values
    pub fn new(id: u32, quota: u64) -> Self {
        Self::with_generator(id, quota, default_item)
    }
}

impl<T> Producer<T>
where
    T: Send,
{
    pub fn with_generator<F>(id: u32, quota: u64, generator: F) -> Self
    where
        F: Fn(u32, u64) -> T + Send + Sync + 'static,
    {
        Self {
            id,
            name: format!("Producer-{}", id),
            quota,
            delay: None,
            generator: Arc::new(generator),
            state: StateHandle::new(),
        }
    }

    /// Pause between two productions (not after the last one)
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

    /// Produce until the quota is met or `cancel` fires
    pub fn run<B>(&self, buffer: &B, cancel: &CancellationToken) -> WorkerReport
    where
        B: BoundedBuffer<T> + ?Sized,
    {
        self.state.set(WorkerState::Running);
        info!(worker = %self.name, quota = self.quota, "Starting production");

        let mut completed = 0;
        for sequence in 1..=self.quota {
            if cancel.is_cancelled() {
                return self.cancelled(completed);
            }

            let item = (self.generator)(self.id, sequence);
            debug!(worker = %self.name, sequence, "Producing item");

            if buffer.is_full() {
                self.state.set(WorkerState::Blocked);
                debug!(worker = %self.name, "Waiting, buffer full");
            }

            if let Err(err) = buffer.put(item, cancel) {
                warn!(worker = %self.name, error = %err, "Put aborted");
                return self.cancelled(completed);
            }
            completed += 1;
            self.state.set(WorkerState::Running);

            if sequence < self.quota {
                if let Some(delay) = self.delay {
                    if !pause(delay, cancel) {
                        return self.cancelled(completed);
                    }
                }
            }
        }

        self.state.set(WorkerState::Done);
        info!(worker = %self.name, produced = completed, "Finished production");
        self.report(completed)
    }

    fn cancelled(&self, completed: u64) -> WorkerReport {
        self.state.set(WorkerState::Cancelled);
        warn!(worker = %self.name, produced = completed, "Production cancelled");
        self.report(completed)
    }

    fn report(&self, completed: u64) -> WorkerReport {
        WorkerReport {
            name: self.name.clone(),
            role: WorkerRole::Producer,
            quota: self.quota,
            completed,
            state: self.state.get(),
        }
    }
}
