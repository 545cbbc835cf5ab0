/*!
 * Workers
 *
 * Producer and consumer loops driving a shared bounded buffer. Each worker
 * owns its counters; the buffer is the only synchronization boundary.
 */

mod consumer;
mod producer;
mod types;

pub use consumer::Consumer;
pub use producer::{default_item, Producer};
pub use types::{StateHandle, WorkerReport, WorkerRole, WorkerState};
