/*!
 * Condition-Wait Buffer Strategy
 *
 * One `parking_lot::Mutex` guards the item queue; two condvars carry the
 * "not full" and "not empty" wake-ups.
 *
 * # Design: Broadcast Wake With Predicate Re-check
 *
 * Every successful put notifies *all* waiters on `not_empty`, every successful
 * take notifies *all* waiters on `not_full`. Waiters always re-check their
 * predicate in a loop after waking. This combination is what keeps the buffer
 * live: a single-target wake could land on a waiter that cannot proceed (a
 * second consumer racing for the same item, or a waiter that was cancelled or
 * timed out) while the waiter that could proceed keeps sleeping. Broadcasting
 * costs extra wake-and-recheck cycles but never strands a runnable waiter.
 * Do not turn these into `notify_one` calls.
 *
 * Waits are sliced by the configured poll interval so that a cancellation
 * token is observed within one slice even if no put/take happens.
 */

use super::cancel::CancellationToken;
use super::config::{BufferConfig, StrategyType};
use super::stats::{BufferStats, OpCounters};
use super::traits::BoundedBuffer;
use crate::core::errors::{BufferError, BufferResult};
use crate::core::limits::MAX_BUFFER_CAPACITY;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Mutex + condvar bounded buffer
pub struct CondvarBuffer<T> {
    items: Mutex<VecDeque<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
    poll_interval: Duration,
    counters: OpCounters,
}

impl<T> CondvarBuffer<T>
where
    T: Send,
{
    /// Create a buffer holding at most `capacity` items
    pub fn new(capacity: usize) -> BufferResult<Self> {
        Self::with_config(&BufferConfig::new(StrategyType::Condvar, capacity))
    }

    /// Create from a configuration (the `strategy` field is ignored)
    pub fn with_config(config: &BufferConfig) -> BufferResult<Self> {
        if config.capacity == 0 || config.capacity > MAX_BUFFER_CAPACITY {
            return Err(BufferError::invalid_capacity(
                config.capacity,
                MAX_BUFFER_CAPACITY,
            ));
        }

        Ok(Self {
            items: Mutex::new(VecDeque::with_capacity(config.capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity: config.capacity,
            poll_interval: config.poll_interval(),
            counters: OpCounters::default(),
        })
    }

    /// One bounded sleep on `condvar`
    ///
    /// Releases the lock for the duration of the slice. Callers loop on their
    /// predicate; a timed-out slice simply falls through to the re-check.
    fn wait_slice(
        &self,
        condvar: &Condvar,
        guard: &mut MutexGuard<'_, VecDeque<T>>,
        deadline: Option<(Instant, Duration)>,
        cancel: &CancellationToken,
    ) -> BufferResult<()> {
        if cancel.is_cancelled() {
            return Err(BufferError::Cancelled);
        }

        let mut slice = self.poll_interval;
        if let Some((deadline, timeout)) = deadline {
            let now = Instant::now();
            if now >= deadline {
                return Err(BufferError::Timeout(timeout));
            }
            slice = slice.min(deadline - now);
        }

        condvar.wait_for(guard, slice);
        Ok(())
    }
}

impl<T> BoundedBuffer<T> for CondvarBuffer<T>
where
    T: Send,
{
    fn put_deadline(
        &self,
        item: T,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> BufferResult<()> {
        if cancel.is_cancelled() {
            return Err(BufferError::Cancelled);
        }

        let mut items = self.items.lock();
        if items.len() >= self.capacity {
            debug!(size = items.len(), capacity = self.capacity, "Buffer full, producer waiting");
        }

        let deadline = timeout.map(|t| (Instant::now() + t, t));
        while items.len() >= self.capacity {
            self.wait_slice(&self.not_full, &mut items, deadline, cancel)?;
        }

        items.push_back(item);
        self.counters.record_put();
        debug!(size = items.len(), capacity = self.capacity, "Item added");

        self.not_empty.notify_all();
        Ok(())
    }

    fn take_deadline(
        &self,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> BufferResult<T> {
        if cancel.is_cancelled() {
            return Err(BufferError::Cancelled);
        }

        let mut items = self.items.lock();
        if items.is_empty() {
            debug!(size = 0, capacity = self.capacity, "Buffer empty, consumer waiting");
        }

        let deadline = timeout.map(|t| (Instant::now() + t, t));
        let item = loop {
            if let Some(item) = items.pop_front() {
                break item;
            }
            self.wait_slice(&self.not_empty, &mut items, deadline, cancel)?;
        };
        self.counters.record_take();
        debug!(size = items.len(), capacity = self.capacity, "Item removed");

        self.not_full.notify_all();
        Ok(item)
    }

    fn try_put(&self, item: T) -> Result<(), T> {
        let mut items = self.items.lock();
        if items.len() >= self.capacity {
            return Err(item);
        }

        items.push_back(item);
        self.counters.record_put();
        self.not_empty.notify_all();
        Ok(())
    }

    fn try_take(&self) -> Option<T> {
        let mut items = self.items.lock();
        let item = items.pop_front()?;
        self.counters.record_take();
        self.not_full.notify_all();
        Some(item)
    }

    #[inline]
    fn size(&self) -> usize {
        self.items.lock().len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn stats(&self) -> BufferStats {
        let size = self.size();
        self.counters.snapshot(self.strategy_name(), self.capacity, size)
    }

    fn strategy_name(&self) -> &'static str {
        StrategyType::Condvar.as_str()
    }
}
