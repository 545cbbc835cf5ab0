/*!
 * Channel Buffer Strategy
 *
 * Delegates storage, ordering and blocking to a bounded `flume` channel.
 * The buffer owns both ends, so the channel never disconnects while the
 * buffer is alive.
 *
 * Blocking calls use `send_timeout`/`recv_timeout` in poll-interval slices.
 * A timed-out send hands the item back, so cancellation between slices
 * never leaves a partial enqueue behind.
 */

use super::cancel::CancellationToken;
use super::config::{BufferConfig, StrategyType};
use super::stats::{BufferStats, OpCounters};
use super::traits::BoundedBuffer;
use crate::core::errors::{BufferError, BufferResult};
use crate::core::limits::MAX_BUFFER_CAPACITY;
use flume::{Receiver, RecvTimeoutError, SendTimeoutError, Sender, TryRecvError, TrySendError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Bounded buffer backed by `flume::bounded`
pub struct ChannelBuffer<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
    capacity: usize,
    poll_interval: Duration,
    counters: OpCounters,
}

impl<T> ChannelBuffer<T>
where
    T: Send,
{
    /// Create a buffer holding at most `capacity` items
    pub fn new(capacity: usize) -> BufferResult<Self> {
        Self::with_config(&BufferConfig::new(StrategyType::Channel, capacity))
    }

    /// Create from a configuration (the `strategy` field is ignored)
    pub fn with_config(config: &BufferConfig) -> BufferResult<Self> {
        // flume treats capacity 0 as a rendezvous channel; reject it here
        if config.capacity == 0 || config.capacity > MAX_BUFFER_CAPACITY {
            return Err(BufferError::invalid_capacity(
                config.capacity,
                MAX_BUFFER_CAPACITY,
            ));
        }

        let (tx, rx) = flume::bounded(config.capacity);
        Ok(Self {
            tx,
            rx,
            capacity: config.capacity,
            poll_interval: config.poll_interval(),
            counters: OpCounters::default(),
        })
    }

    /// Length of the next blocking slice, or the terminal error
    fn next_slice(
        &self,
        deadline: Option<(Instant, Duration)>,
        cancel: &CancellationToken,
    ) -> BufferResult<Duration> {
        if cancel.is_cancelled() {
            return Err(BufferError::Cancelled);
        }

        match deadline {
            Some((deadline, timeout)) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(BufferError::Timeout(timeout));
                }
                Ok(self.poll_interval.min(deadline - now))
            }
            None => Ok(self.poll_interval),
        }
    }
}

impl<T> BoundedBuffer<T> for ChannelBuffer<T>
where
    T: Send,
{
    fn put_deadline(
        &self,
        item: T,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> BufferResult<()> {
        // Observational only: another producer may fill the slot before the send below
        debug!(size = self.tx.len(), capacity = self.capacity, "Attempting to add item");

        let deadline = timeout.map(|t| (Instant::now() + t, t));
        let mut item = item;
        loop {
            // An expired deadline still gets one non-blocking attempt
            let slice = match self.next_slice(deadline, cancel) {
                Ok(slice) => slice,
                Err(BufferError::Timeout(timeout)) => match self.tx.try_send(item) {
                    Ok(()) => break,
                    Err(_) => return Err(BufferError::Timeout(timeout)),
                },
                Err(err) => return Err(err),
            };
            match self.tx.send_timeout(item, slice) {
                Ok(()) => break,
                Err(SendTimeoutError::Timeout(back)) | Err(SendTimeoutError::Disconnected(back)) => {
                    item = back;
                }
            }
        }

        self.counters.record_put();
        debug!(size = self.tx.len(), capacity = self.capacity, "Item added");
        Ok(())
    }

    fn take_deadline(
        &self,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> BufferResult<T> {
        debug!(size = self.rx.len(), capacity = self.capacity, "Attempting to take item");

        let deadline = timeout.map(|t| (Instant::now() + t, t));
        let item = loop {
            let slice = match self.next_slice(deadline, cancel) {
                Ok(slice) => slice,
                Err(BufferError::Timeout(timeout)) => match self.rx.try_recv() {
                    Ok(item) => break item,
                    Err(_) => return Err(BufferError::Timeout(timeout)),
                },
                Err(err) => return Err(err),
            };
            match self.rx.recv_timeout(slice) {
                Ok(item) => break item,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => continue,
            }
        };

        self.counters.record_take();
        debug!(size = self.rx.len(), capacity = self.capacity, "Item removed");
        Ok(item)
    }

    fn try_put(&self, item: T) -> Result<(), T> {
        match self.tx.try_send(item) {
            Ok(()) => {
                self.counters.record_put();
                Ok(())
            }
            Err(TrySendError::Full(item)) | Err(TrySendError::Disconnected(item)) => Err(item),
        }
    }

    fn try_take(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(item) => {
                self.counters.record_take();
                Some(item)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    #[inline]
    fn size(&self) -> usize {
        self.tx.len()
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
        StrategyType::Channel.as_str()
    }
}
