/*!
 * Monitoring
 * Tracing subscriber setup and span helpers
 */

mod tracer;

pub use tracer::{init_tracing, run_span, worker_span};
