/*!
 * Synchronization Primitives
 *
 * Bounded producer/consumer hand-off with two interchangeable strategies:
 * - Condvar-based: explicit mutex + condition variables, broadcast wake
 * - Channel-based: a bounded `flume` channel doing its own locking
 *
 * # Architecture
 *
 * `BoundedBuffer` is the contract; `HandoffBuffer` picks a strategy from a
 * `BufferConfig` at construction time and dispatches through an enum.
 * Blocking calls take a `CancellationToken` observed at every suspension point.
 *
 * # Use Cases
 *
 * - **Worker pipelines**: producers block on full, consumers block on empty
 * - **Strategy comparison**: run the same workload against both strategies
 */

mod buffer;
mod cancel;
mod channel;
mod condvar;
mod config;
mod stats;
mod traits;

pub use buffer::HandoffBuffer;
pub use cancel::CancellationToken;
pub use config::{BufferConfig, StrategyType};
pub use stats::BufferStats;
pub use traits::BoundedBuffer;

// Re-export specific strategies for advanced users
pub use channel::ChannelBuffer;
pub use condvar::CondvarBuffer;
