/*!
 * Buffer Statistics
 * Point-in-time occupancy snapshot for logging and visualization
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Buffer statistics
///
/// `size` is a single consistent read; the counters are monotonic and may run
/// one operation ahead of `size` when read during a concurrent put/take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferStats {
    pub strategy: String,
    pub capacity: usize,
    pub size: usize,
    pub total_put: u64,
    pub total_taken: u64,
}

impl BufferStats {
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_full(&self) -> bool {
        self.size >= self.capacity
    }
}

/// Monotonic operation counters shared by both strategies
#[derive(Debug, Default)]
pub(crate) struct OpCounters {
    put: AtomicU64,
    taken: AtomicU64,
}

impl OpCounters {
    #[inline]
    pub fn record_put(&self) {
        self.put.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_take(&self) {
        self.taken.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, strategy: &str, capacity: usize, size: usize) -> BufferStats {
        BufferStats {
            strategy: strategy.to_string(),
            capacity,
            size,
            total_put: self.put.load(Ordering::Relaxed),
            total_taken: self.taken.load(Ordering::Relaxed),
        }
    }
}
