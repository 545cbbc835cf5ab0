/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Bounded buffer errors
///
/// `InvalidConfiguration` is fatal to construction. `Cancelled` and `Timeout`
/// are recoverable: the caller decides whether to retry, stop, or propagate.
/// Neither of them changes the buffer contents.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum BufferError {
    #[error("Invalid buffer configuration: {0}")]
    #[diagnostic(
        code(buffer::invalid_configuration),
        help("Capacity must be at least 1 and at most MAX_BUFFER_CAPACITY.")
    )]
    InvalidConfiguration(String),

    #[error("Blocking operation was cancelled")]
    #[diagnostic(
        code(buffer::cancelled),
        help("The cancellation token was triggered while waiting. The buffer is unchanged.")
    )]
    Cancelled,

    #[error("Blocking operation timed out after {0:?}")]
    #[diagnostic(
        code(buffer::timeout),
        help("The buffer stayed full (put) or empty (take) for the whole timeout.")
    )]
    Timeout(Duration),
}

impl BufferError {
    /// Whether the error came from a cancellation token
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, BufferError::Cancelled)
    }

    pub(crate) fn invalid_capacity(capacity: usize, max: usize) -> Self {
        BufferError::InvalidConfiguration(format!(
            "capacity {} is outside 1..={}",
            capacity, max
        ))
    }
}

/// Harness errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum HarnessError {
    #[error("Invalid simulation config: {0}")]
    #[diagnostic(
        code(harness::invalid_config),
        help("At least one producer and one consumer are required.")
    )]
    Invalid(String),

    #[error("Environment variable {name} has invalid value {value:?}")]
    #[diagnostic(code(harness::invalid_env))]
    InvalidEnv { name: String, value: String },

    #[error("Failed to spawn worker {name}: {reason}")]
    #[diagnostic(
        code(harness::spawn_failed),
        help("The OS refused to create a thread. Lower the worker count.")
    )]
    Spawn { name: String, reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Buffer(#[from] BufferError),
}
