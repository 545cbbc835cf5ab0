/*!
 * Bounded Buffer Trait
 *
 * The contract both strategies satisfy identically.
 *
 * # Design: Trait at the Strategy Seam
 *
 * `HandoffBuffer` uses enum dispatch over the concrete strategies. This trait
 * lets tests and workers stay generic so the same suite runs unmodified
 * against either strategy.
 */

use super::cancel::CancellationToken;
use super::stats::BufferStats;
use crate::core::errors::BufferResult;
use std::time::Duration;

/// Fixed-capacity FIFO hand-off between producers and consumers
///
/// Implementations must be:
/// - **Thread-safe**: every mutation is exclusive
/// - **FIFO**: items leave in the order their `put` calls were serialized
/// - **Bounded**: `0 <= size() <= capacity()` at every observable point
/// - **Cancellation-safe**: an aborted `put`/`take` leaves the buffer unchanged
pub trait BoundedBuffer<T>: Send + Sync
where
    T: Send,
{
    /// Append `item`, blocking while the buffer is full
    ///
    /// Returns `Err(BufferError::Cancelled)` if `cancel` fires while blocked;
    /// the item is then dropped without ever becoming visible.
    fn put(&self, item: T, cancel: &CancellationToken) -> BufferResult<()> {
        self.put_deadline(item, None, cancel)
    }

    /// Remove the head item, blocking while the buffer is empty
    fn take(&self, cancel: &CancellationToken) -> BufferResult<T> {
        self.take_deadline(None, cancel)
    }

    /// `put` that gives up with `BufferError::Timeout` after `timeout`
    fn put_timeout(
        &self,
        item: T,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> BufferResult<()> {
        self.put_deadline(item, Some(timeout), cancel)
    }

    /// `take` that gives up with `BufferError::Timeout` after `timeout`
    fn take_timeout(&self, timeout: Duration, cancel: &CancellationToken) -> BufferResult<T> {
        self.take_deadline(Some(timeout), cancel)
    }

    /// Shared blocking put path
    fn put_deadline(
        &self,
        item: T,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> BufferResult<()>;

    /// Shared blocking take path
    fn take_deadline(
        &self,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> BufferResult<T>;

    /// Non-blocking put; hands the item back when full
    fn try_put(&self, item: T) -> Result<(), T>;

    /// Non-blocking take
    fn try_take(&self) -> Option<T>;

    /// Point-in-time occupancy
    fn size(&self) -> usize;

    /// The fixed bound
    fn capacity(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.size() >= self.capacity()
    }

    #[inline]
    fn remaining_capacity(&self) -> usize {
        self.capacity().saturating_sub(self.size())
    }

    /// Snapshot for observability collaborators
    fn stats(&self) -> BufferStats;

    /// Strategy name for logging
    fn strategy_name(&self) -> &'static str;
}
