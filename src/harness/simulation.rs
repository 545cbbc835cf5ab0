/*!
 * Simulation Orchestrator
 *
 * Spawns producer and consumer threads around one shared buffer, waits for
 * them, and aggregates their reports. Uses only the public buffer contract.
 */

use super::config::SimulationConfig;
use crate::core::errors::HarnessError;
use crate::core::sync::{BoundedBuffer, BufferStats, CancellationToken, HandoffBuffer, StrategyType};
use crate::monitoring::{run_span, worker_span};
use crate::workers::{Consumer, Producer, StateHandle, WorkerReport, WorkerRole, WorkerState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{error, info, Span};
use uuid::Uuid;

/// Aggregated outcome of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub run_id: Uuid,
    pub strategy: StrategyType,
    pub capacity: usize,
    pub elapsed_ms: u64,
    pub cancelled: bool,
    pub producers: Vec<WorkerReport>,
    pub consumers: Vec<WorkerReport>,
    pub final_occupancy: usize,
    pub total_produced: u64,
    pub total_consumed: u64,
}

impl SimulationReport {
    /// Every produced item is either consumed or still in the buffer
    pub fn is_consistent(&self) -> bool {
        self.total_produced == self.total_consumed + self.final_occupancy as u64
    }

    /// All workers reached `Done` with their full quota
    pub fn is_complete(&self) -> bool {
        self.producers
            .iter()
            .chain(self.consumers.iter())
            .all(WorkerReport::is_complete)
    }
}

struct WorkerThread {
    name: String,
    role: WorkerRole,
    quota: u64,
    state: StateHandle,
    handle: JoinHandle<WorkerReport>,
}

impl WorkerThread {
    fn join(self) -> WorkerReport {
        match self.handle.join() {
            Ok(report) => report,
            Err(_) => {
                // Progress of a panicked worker is unknown; report none
                error!(worker = %self.name, "Worker thread panicked");
                WorkerReport {
                    name: self.name,
                    role: self.role,
                    quota: self.quota,
                    completed: 0,
                    state: WorkerState::Cancelled,
                }
            }
        }
    }
}

/// Entry points for running simulations
pub struct Simulation;

impl Simulation {
    /// Build the buffer described by `config` and start all workers
    pub fn start(config: SimulationConfig) -> Result<SimulationHandle, HarnessError> {
        config.validate()?;
        let buffer = Arc::new(HandoffBuffer::new(config.buffer_config())?);
        Self::start_on(buffer, config)
    }

    /// Start workers on an existing buffer
    ///
    /// `config.strategy` and `config.capacity` are ignored in favor of the buffer's own.
    pub fn start_on(
        buffer: Arc<HandoffBuffer<u64>>,
        config: SimulationConfig,
    ) -> Result<SimulationHandle, HarnessError> {
        config.validate()?;

        let run_id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let span = run_span(&run_id.to_string(), buffer.strategy().as_str());
        let _entered = span.enter();
        info!(
            strategy = %buffer.strategy(),
            capacity = buffer.capacity(),
            producers = config.producers,
            consumers = config.consumers,
            total_items = config.total_items(),
            "Starting simulation"
        );

        let mut handle = SimulationHandle {
            run_id,
            buffer,
            cancel,
            span: span.clone(),
            producers: Vec::with_capacity(config.producers),
            consumers: Vec::with_capacity(config.consumers),
            started: Instant::now(),
        };

        for id in 1..=config.producers as u32 {
            let producer = Producer::new(id, config.items_per_producer)
                .with_delay(config.producer_delay());
            let worker = handle.spawn_producer(producer)?;
            handle.producers.push(worker);
        }

        for (index, quota) in config.consumer_quotas().into_iter().enumerate() {
            let consumer =
                Consumer::<u64>::new(index as u32 + 1, quota).with_delay(config.consumer_delay());
            let worker = handle.spawn_consumer(consumer)?;
            handle.consumers.push(worker);
        }

        Ok(handle)
    }

    /// Start and wait for completion
    pub fn run(config: SimulationConfig) -> Result<SimulationReport, HarnessError> {
        Ok(Self::start(config)?.join())
    }
}

/// A running simulation
///
/// Dropping the handle without `join`/`stop` detaches the worker threads.
pub struct SimulationHandle {
    run_id: Uuid,
    buffer: Arc<HandoffBuffer<u64>>,
    cancel: CancellationToken,
    span: Span,
    producers: Vec<WorkerThread>,
    consumers: Vec<WorkerThread>,
    started: Instant,
}

impl SimulationHandle {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Shared buffer, for occupancy reads
    pub fn buffer(&self) -> &Arc<HandoffBuffer<u64>> {
        &self.buffer
    }

    pub fn stats(&self) -> BufferStats {
        self.buffer.stats()
    }

    /// Current state of every worker, producers first
    pub fn worker_states(&self) -> Vec<(String, WorkerState)> {
        self.producers
            .iter()
            .chain(self.consumers.iter())
            .map(|w| (w.name.clone(), w.state.get()))
            .collect()
    }

    pub fn is_finished(&self) -> bool {
        self.producers
            .iter()
            .chain(self.consumers.iter())
            .all(|w| w.handle.is_finished())
    }

    /// Cancel every worker and wait for them to stop
    pub fn stop(self) -> SimulationReport {
        self.span.in_scope(|| info!("Stopping simulation"));
        self.cancel.cancel();
        self.join()
    }

    /// Wait for every worker
    pub fn join(self) -> SimulationReport {
        let producers: Vec<_> = self.producers.into_iter().map(WorkerThread::join).collect();
        let consumers: Vec<_> = self.consumers.into_iter().map(WorkerThread::join).collect();

        let report = SimulationReport {
            run_id: self.run_id,
            strategy: self.buffer.strategy(),
            capacity: self.buffer.capacity(),
            elapsed_ms: self.started.elapsed().as_millis() as u64,
            cancelled: self.cancel.is_cancelled(),
            total_produced: producers.iter().map(|r| r.completed).sum(),
            total_consumed: consumers.iter().map(|r| r.completed).sum(),
            final_occupancy: self.buffer.size(),
            producers,
            consumers,
        };

        let _entered = self.span.enter();
        info!(
            elapsed_ms = report.elapsed_ms,
            produced = report.total_produced,
            consumed = report.total_consumed,
            remaining = report.final_occupancy,
            "Simulation finished"
        );
        report
    }

    fn spawn_producer(&self, producer: Producer<u64>) -> Result<WorkerThread, HarnessError> {
        let name = producer.name().to_string();
        let quota = producer.quota();
        let state = producer.state_handle();
        let buffer = self.buffer.clone();
        let cancel = self.cancel.clone();

        let handle = self.spawn(&name, WorkerRole::Producer, move || {
            producer.run(&*buffer, &cancel)
        })?;
        Ok(WorkerThread {
            name,
            role: WorkerRole::Producer,
            quota,
            state,
            handle,
        })
    }

    fn spawn_consumer(&self, consumer: Consumer<u64>) -> Result<WorkerThread, HarnessError> {
        let name = consumer.name().to_string();
        let quota = consumer.quota();
        let state = consumer.state_handle();
        let buffer = self.buffer.clone();
        let cancel = self.cancel.clone();

        let handle = self.spawn(&name, WorkerRole::Consumer, move || {
            consumer.run(&*buffer, &cancel)
        })?;
        Ok(WorkerThread {
            name,
            role: WorkerRole::Consumer,
            quota,
            state,
            handle,
        })
    }

    fn spawn<F>(
        &self,
        name: &str,
        role: WorkerRole,
        body: F,
    ) -> Result<JoinHandle<WorkerReport>, HarnessError>
    where
        F: FnOnce() -> WorkerReport + Send + 'static,
    {
        let span = self
            .span
            .in_scope(|| worker_span(name, &role.to_string()));

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || span.in_scope(body))
            .map_err(|e| {
                // Already-spawned workers must not block forever on a half-built run
                self.cancel.cancel();
                HarnessError::Spawn {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            })
    }
}

/// Result of a drain-and-reconstruct capacity change
pub struct Resized {
    /// Report of the stopped run
    pub report: SimulationReport,
    /// Items left in the old buffer, in FIFO order
    pub drained: Vec<u64>,
    /// Fresh, empty buffer with the requested capacity
    pub buffer: Arc<HandoffBuffer<u64>>,
}

/// Change capacity by stopping the run, draining and swapping buffers
///
/// The live buffer is never resized in place. The replacement is built by the
/// caller (`HandoffBuffer::with_capacity`), so an invalid capacity fails with
/// `BufferError::InvalidConfiguration` before any worker is stopped.
pub fn resize(handle: SimulationHandle, replacement: HandoffBuffer<u64>) -> Resized {
    let old = handle.buffer.clone();
    let report = handle.stop();
    let drained: Vec<u64> = std::iter::from_fn(|| old.try_take()).collect();

    info!(
        old_capacity = old.capacity(),
        new_capacity = replacement.capacity(),
        drained = drained.len(),
        "Buffer rebuilt with new capacity"
    );

    Resized {
        report,
        drained,
        buffer: Arc::new(replacement),
    }
}
