//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Read query against the endpoint pool:
//!     → timeouts.rs (deadline on each individual attempt)
//!     → On fault: retries.rs (advance endpoint, count failed sweeps)
//!     → On new sweep: backoff.rs (optional jittered pause)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Retries only for read-only calls; writes are submitted exactly once
//! - The retry budget is counted in full sweeps, not single attempts

pub mod backoff;
pub mod retries;
pub mod timeouts;
