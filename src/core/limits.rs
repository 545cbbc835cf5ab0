/*!
 * System Limits and Constants
 *
 * Centralized location for buffer limits, timing slices and demo defaults.
 *
 * ## Design Philosophy
 * - Values are grouped by domain (buffer, cancellation, workers)
 * - Performance-critical constants are marked with [PERF]
 */

use std::time::Duration;

// =============================================================================
// BUFFER LIMITS
// =============================================================================

/// Upper bound on buffer capacity (1M slots)
/// Both strategies preallocate storage for the full capacity
pub const MAX_BUFFER_CAPACITY: usize = 1 << 20;

/// Capacity used by the demonstration harness
pub const DEFAULT_BUFFER_CAPACITY: usize = 5;

// =============================================================================
// CANCELLATION
// =============================================================================

/// Longest a blocked put/take sleeps before re-checking its cancellation token
/// [PERF] Lower values cancel faster but wake idle waiters more often
pub const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Poll interval for latency-sensitive configurations
pub const LOW_LATENCY_POLL_INTERVAL: Duration = Duration::from_millis(1);

// =============================================================================
// WORKER DEFAULTS
// =============================================================================

/// Producers in the demonstration harness
pub const DEFAULT_PRODUCERS: usize = 2;

/// Consumers in the demonstration harness
pub const DEFAULT_CONSUMERS: usize = 2;

/// Items generated by each producer in the demonstration harness
pub const DEFAULT_ITEMS_PER_PRODUCER: u64 = 5;

/// Delay between two productions (ms)
pub const DEFAULT_PRODUCER_DELAY_MS: u64 = 50;

/// Delay between two consumptions (ms)
pub const DEFAULT_CONSUMER_DELAY_MS: u64 = 75;

/// Multiplier separating producer ids in generated item values
/// Producer 2's third item is 2003
pub const ITEM_ID_STRIDE: u64 = 1000;
