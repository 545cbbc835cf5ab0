/*!
 * Buffer Configuration
 *
 * Construction-time strategy selection for bounded buffers
 */

use crate::core::limits::{
    CANCEL_POLL_INTERVAL, DEFAULT_BUFFER_CAPACITY, LOW_LATENCY_POLL_INTERVAL,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Strategy type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    /// Explicit mutex + condition variable with broadcast wake
    Condvar,
    /// Delegates to a bounded flume channel
    Channel,
}

impl StrategyType {
    pub const ALL: [StrategyType; 2] = [StrategyType::Condvar, StrategyType::Channel];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyType::Condvar => "condvar",
            StrategyType::Channel => "channel",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "condvar" | "synchronized" => Ok(StrategyType::Condvar),
            "channel" | "queue" | "blocking_queue" => Ok(StrategyType::Channel),
            other => Err(format!("unknown buffer strategy: {}", other)),
        }
    }
}

/// Buffer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    /// Synchronization strategy
    pub strategy: StrategyType,
    /// Maximum simultaneous occupancy
    pub capacity: usize,
    /// Longest sleep between two cancellation checks while blocked
    pub cancel_poll_interval: Duration,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyType::Condvar,
            capacity: DEFAULT_BUFFER_CAPACITY,
            cancel_poll_interval: CANCEL_POLL_INTERVAL,
        }
    }
}

impl BufferConfig {
    pub fn new(strategy: StrategyType, capacity: usize) -> Self {
        Self {
            strategy,
            capacity,
            ..Default::default()
        }
    }

    /// Configuration with faster cancellation response
    pub fn low_latency(strategy: StrategyType, capacity: usize) -> Self {
        Self {
            strategy,
            capacity,
            cancel_poll_interval: LOW_LATENCY_POLL_INTERVAL,
        }
    }

    /// Poll interval clamped away from zero
    pub(crate) fn poll_interval(&self) -> Duration {
        self.cancel_poll_interval.max(Duration::from_micros(100))
    }
}
