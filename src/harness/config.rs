/*!
 * Simulation Configuration
 *
 * Defaults reproduce the classic demo: capacity 5, two producers of five
 * items each, two consumers splitting the ten items.
 *
 * Environment variables (all optional):
 * - HANDOFF_STRATEGY: condvar | channel
 * - HANDOFF_CAPACITY, HANDOFF_PRODUCERS, HANDOFF_CONSUMERS, HANDOFF_ITEMS
 * - HANDOFF_PRODUCER_DELAY_MS, HANDOFF_CONSUMER_DELAY_MS
 */

use crate::core::errors::HarnessError;
use crate::core::limits::{
    DEFAULT_BUFFER_CAPACITY, DEFAULT_CONSUMERS, DEFAULT_CONSUMER_DELAY_MS,
    DEFAULT_ITEMS_PER_PRODUCER, DEFAULT_PRODUCERS, DEFAULT_PRODUCER_DELAY_MS,
};
use crate::core::sync::{BufferConfig, StrategyType};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub strategy: StrategyType,
    pub capacity: usize,
    pub producers: usize,
    pub consumers: usize,
    pub items_per_producer: u64,
    pub producer_delay_ms: u64,
    pub consumer_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyType::Condvar,
            capacity: DEFAULT_BUFFER_CAPACITY,
            producers: DEFAULT_PRODUCERS,
            consumers: DEFAULT_CONSUMERS,
            items_per_producer: DEFAULT_ITEMS_PER_PRODUCER,
            producer_delay_ms: DEFAULT_PRODUCER_DELAY_MS,
            consumer_delay_ms: DEFAULT_CONSUMER_DELAY_MS,
        }
    }
}

impl SimulationConfig {
    /// Defaults with `HANDOFF_*` environment overrides applied
    pub fn from_env() -> Result<Self, HarnessError> {
        let mut config = Self::default();
        env_override("HANDOFF_STRATEGY", &mut config.strategy)?;
        env_override("HANDOFF_CAPACITY", &mut config.capacity)?;
        env_override("HANDOFF_PRODUCERS", &mut config.producers)?;
        env_override("HANDOFF_CONSUMERS", &mut config.consumers)?;
        env_override("HANDOFF_ITEMS", &mut config.items_per_producer)?;
        env_override("HANDOFF_PRODUCER_DELAY_MS", &mut config.producer_delay_ms)?;
        env_override("HANDOFF_CONSUMER_DELAY_MS", &mut config.consumer_delay_ms)?;
        Ok(config)
    }

    /// Same workload, no delays
    pub fn without_delays(mut self) -> Self {
        self.producer_delay_ms = 0;
        self.consumer_delay_ms = 0;
        self
    }

    /// Worker-count checks; capacity is validated by the buffer itself
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.producers == 0 || self.consumers == 0 {
            return Err(HarnessError::Invalid(format!(
                "need at least one producer and one consumer, got {} and {}",
                self.producers, self.consumers
            )));
        }
        Ok(())
    }

    pub fn buffer_config(&self) -> BufferConfig {
        BufferConfig::new(self.strategy, self.capacity)
    }

    pub fn total_items(&self) -> u64 {
        self.producers as u64 * self.items_per_producer
    }

    /// Per-consumer quotas summing to `total_items()`
    ///
    /// The remainder of an uneven split goes to the first consumers.
    pub fn consumer_quotas(&self) -> Vec<u64> {
        if self.consumers == 0 {
            return Vec::new();
        }
        let consumers = self.consumers as u64;
        let base = self.total_items() / consumers;
        let extra = self.total_items() % consumers;
        (0..consumers)
            .map(|i| base + u64::from(i < extra))
            .collect()
    }

    pub fn producer_delay(&self) -> Duration {
        Duration::from_millis(self.producer_delay_ms)
    }

    pub fn consumer_delay(&self) -> Duration {
        Duration::from_millis(self.consumer_delay_ms)
    }
}

fn env_override<T: FromStr>(name: &str, target: &mut T) -> Result<(), HarnessError> {
    let Ok(value) = std::env::var(name) else {
        return Ok(());
    };
    *target = value.trim().parse().map_err(|_| HarnessError::InvalidEnv {
        name: name.to_string(),
        value,
    })?;
    Ok(())
}
