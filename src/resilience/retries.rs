//! Sweep-based retry budget for read queries.
//!
//! # Responsibilities
//! - Track which endpoint the next attempt goes to
//! - Count full sweeps through the endpoint list that ended in a fault
//! - Declare the budget exhausted after `MAX_QUERY_SWEEPS` failed sweeps
//!
//! # Design Decisions
//! - Endpoints are visited in configured order on every sweep, never reordered
//! - Only reads are retried; writes are never resubmitted
//! - The cursor is owned by one invocation and dropped with it

/// Number of full sweeps through the endpoint list before a read fails.
pub const MAX_QUERY_SWEEPS: u32 = 3;

/// What to do after an attempt faulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Try the next endpoint in the current sweep.
    NextEndpoint,
    /// Wrapped past the last endpoint; start a new sweep at index 0.
    NewSweep,
    /// The retry budget is spent.
    Exhausted,
}

/// Per-invocation call attempt state: `{endpoint index, error count}`.
#[derive(Debug, Clone)]
pub struct SweepCursor {
    endpoint_count: usize,
    endpoint_idx: usize,
    failed_sweeps: u32,
    max_sweeps: u32,
    attempts: usize,
}

impl SweepCursor {
    /// Start at endpoint 0 with no failed sweeps.
    pub fn new(endpoint_count: usize, max_sweeps: u32) -> Self {
        Self {
            endpoint_count,
            endpoint_idx: 0,
            failed_sweeps: 0,
            max_sweeps,
            attempts: 0,
        }
    }

    /// Index of the endpoint the next attempt should use.
    pub fn endpoint(&self) -> usize {
        self.endpoint_idx
    }

    /// Failed sweeps so far.
    pub fn failed_sweeps(&self) -> u32 {
        self.failed_sweeps
    }

    /// Attempts that have faulted so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Record a faulted attempt on the current endpoint and move on.
    pub fn record_fault(&mut self) -> Advance {
        self.attempts += 1;
        self.endpoint_idx += 1;
        if self.endpoint_idx < self.endpoint_count {
            return Advance::NextEndpoint;
        }

        self.endpoint_idx = 0;
        self.failed_sweeps += 1;
        if self.failed_sweeps >= self.max_sweeps {
            Advance::Exhausted
        } else {
            Advance::NewSweep
        }
    }
}
