/*!
 * Worker Types
 * Lifecycle states, reports and shared helpers for producers and consumers
 */

use crate::core::limits::CANCEL_POLL_INTERVAL;
use crate::core::sync::CancellationToken;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Worker role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerRole {
    Producer,
    Consumer,
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerRole::Producer => f.write_str("producer"),
            WorkerRole::Consumer => f.write_str("consumer"),
        }
    }
}

/// Worker lifecycle
///
/// `Idle -> Running -> (Blocked -> Running)* -> Done`, or `-> Cancelled` from
/// any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum WorkerState {
    Idle = 0,
    Running = 1,
    /// Waiting on a full (producer) or empty (consumer) buffer; observational only
    Blocked = 2,
    Done = 3,
    Cancelled = 4,
}

impl WorkerState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkerState::Done | WorkerState::Cancelled)
    }

    /// Only `StateHandle::set` writes the cell, always from a `WorkerState`
    fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Idle,
            1 => WorkerState::Running,
            2 => WorkerState::Blocked,
            3 => WorkerState::Done,
            4 => WorkerState::Cancelled,
            other => unreachable!("worker state cell holds {}", other),
        }
    }
}

/// Shared, lock-free view of a worker's state
///
/// Clones observe the same worker; the harness keeps one per spawned worker.
#[derive(Debug, Clone)]
pub struct StateHandle(Arc<AtomicU8>);

impl StateHandle {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicU8::new(WorkerState::Idle as u8)))
    }

    #[inline]
    pub fn get(&self) -> WorkerState {
        WorkerState::from_u8(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn set(&self, state: WorkerState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Final (or partial) outcome of one worker run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReport {
    pub name: String,
    pub role: WorkerRole,
    pub quota: u64,
    /// Successful puts (producer) or takes (consumer)
    pub completed: u64,
    pub state: WorkerState,
}

impl WorkerReport {
    pub fn is_complete(&self) -> bool {
        self.state == WorkerState::Done && self.completed == self.quota
    }
}

/// Sleep for `delay` unless cancelled first
///
/// Returns `false` if the token fired. Never touches any buffer.
pub(crate) fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
    let deadline = Instant::now() + delay;
    loop {
        if cancel.is_cancelled() {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(CANCEL_POLL_INTERVAL.min(deadline - now));
    }
}
