/*!
 * Handoff Buffer
 *
 * High-level bounded buffer that selects its strategy at construction time.
 *
 * # Design: Enum Dispatch for Zero-Cost Abstraction
 *
 * Instead of `Arc<dyn BoundedBuffer<T>>`, the strategies sit in an enum and
 * every call is a `match`. Hot paths inline, and the strategy choice stays a
 * plain value that can be logged or serialized.
 */

use super::cancel::CancellationToken;
use super::channel::ChannelBuffer;
use super::condvar::CondvarBuffer;
use super::config::{BufferConfig, StrategyType};
use super::stats::BufferStats;
use super::traits::BoundedBuffer;
use crate::core::errors::BufferResult;
use std::time::Duration;
use tracing::debug;

/// Buffer strategy implementation (enum dispatch)
enum BufferImpl<T> {
    Condvar(CondvarBuffer<T>),
    Channel(ChannelBuffer<T>),
}

/// Bounded FIFO buffer with a construction-time strategy
///
/// Share it between threads with `Arc<HandoffBuffer<T>>`.
///
/// # Examples
///
/// ```
/// use bounded_handoff::core::sync::{BoundedBuffer, CancellationToken, HandoffBuffer, StrategyType};
///
/// let buffer = HandoffBuffer::with_capacity(StrategyType::Condvar, 2).unwrap();
/// let token = CancellationToken::never();
///
/// buffer.put("a", &token).unwrap();
/// buffer.put("b", &token).unwrap();
/// assert!(buffer.is_full());
/// assert_eq!(buffer.take(&token).unwrap(), "a");
/// ```
pub struct HandoffBuffer<T> {
    inner: BufferImpl<T>,
    strategy: StrategyType,
}

impl<T> HandoffBuffer<T>
where
    T: Send,
{
    /// Create a buffer from a configuration
    ///
    /// Fails with `BufferError::InvalidConfiguration` for a zero or oversized capacity.
    pub fn new(config: BufferConfig) -> BufferResult<Self> {
        let inner = match config.strategy {
            StrategyType::Condvar => BufferImpl::Condvar(CondvarBuffer::with_config(&config)?),
            StrategyType::Channel => BufferImpl::Channel(ChannelBuffer::with_config(&config)?),
        };

        debug!(
            strategy = %config.strategy,
            capacity = config.capacity,
            "Bounded buffer created"
        );

        Ok(Self {
            inner,
            strategy: config.strategy,
        })
    }

    /// Create with default timing for the given strategy and capacity
    pub fn with_capacity(strategy: StrategyType, capacity: usize) -> BufferResult<Self> {
        Self::new(BufferConfig::new(strategy, capacity))
    }

    #[inline]
    pub fn strategy(&self) -> StrategyType {
        self.strategy
    }
}

impl<T> BoundedBuffer<T> for HandoffBuffer<T>
where
    T: Send,
{
    #[inline]
    fn put_deadline(
        &self,
        item: T,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> BufferResult<()> {
        match &self.inner {
            BufferImpl::Condvar(b) => b.put_deadline(item, timeout, cancel),
            BufferImpl::Channel(b) => b.put_deadline(item, timeout, cancel),
        }
    }

    #[inline]
    fn take_deadline(
        &self,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> BufferResult<T> {
        match &self.inner {
            BufferImpl::Condvar(b) => b.take_deadline(timeout, cancel),
            BufferImpl::Channel(b) => b.take_deadline(timeout, cancel),
        }
    }

    #[inline]
    fn try_put(&self, item: T) -> Result<(), T> {
        match &self.inner {
            BufferImpl::Condvar(b) => b.try_put(item),
            BufferImpl::Channel(b) => b.try_put(item),
        }
    }

    #[inline]
    fn try_take(&self) -> Option<T> {
        match &self.inner {
            BufferImpl::Condvar(b) => b.try_take(),
            BufferImpl::Channel(b) => b.try_take(),
        }
    }

    #[inline]
    fn size(&self) -> usize {
        match &self.inner {
            BufferImpl::Condvar(b) => b.size(),
            BufferImpl::Channel(b) => b.size(),
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        match &self.inner {
            BufferImpl::Condvar(b) => b.capacity(),
            BufferImpl::Channel(b) => b.capacity(),
        }
    }

    fn stats(&self) -> BufferStats {
        match &self.inner {
            BufferImpl::Condvar(b) => b.stats(),
            BufferImpl::Channel(b) => b.stats(),
        }
    }

    fn strategy_name(&self) -> &'static str {
        self.strategy.as_str()
    }
}
