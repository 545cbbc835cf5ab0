/*!
 * Cooperative Cancellation
 *
 * A shared flag observed by blocking buffer operations at every suspension
 * boundary. Cancelling never interrupts a thread asynchronously; the blocked
 * call notices the flag on its next wake-up (bounded by the poll interval)
 * and returns `BufferError::Cancelled` without touching the buffer.
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clonable cancellation signal
///
/// All clones observe the same flag. Cancelling is idempotent and cannot be undone.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for callers that never cancel
    pub fn never() -> Self {
        Self::default()
    }

    /// Request cancellation
    ///
    /// Returns `true` if this call flipped the flag
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    #[inline(always)]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
