/*!
 * Bounded Handoff Library
 * Thread-safe bounded buffer with condvar and channel strategies,
 * producer/consumer workers and a simulation harness
 */

pub mod core;
pub mod harness;
pub mod monitoring;
pub mod workers;

// Re-exports
pub use crate::core::errors::{BufferError, BufferResult, HarnessError};
pub use crate::core::sync::{
    BoundedBuffer, BufferConfig, BufferStats, CancellationToken, HandoffBuffer, StrategyType,
};
pub use harness::{Simulation, SimulationConfig, SimulationReport};
pub use monitoring::init_tracing;
pub use workers::{Consumer, Producer, WorkerReport, WorkerState};
