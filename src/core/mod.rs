/*!
 * Core
 * Buffer primitives, error taxonomy and shared limits
 */

pub mod errors;
pub mod limits;
pub mod sync;

pub use errors::{BufferError, BufferResult, HarnessError};
