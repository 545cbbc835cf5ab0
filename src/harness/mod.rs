/*!
 * Harness
 *
 * Orchestrates producers and consumers around one shared buffer:
 * choosing capacity and worker counts, spawning, joining, and reporting.
 * Contains no synchronization logic of its own.
 */

mod config;
mod simulation;

pub use config::SimulationConfig;
pub use simulation::{resize, Resized, Simulation, SimulationHandle, SimulationReport};
