//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Query/Write executors produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (attempt and outcome counters)
//! ```

pub mod logging;
pub mod metrics;
