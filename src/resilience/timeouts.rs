//! Per-attempt timeout enforcement.
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - A timed-out attempt is reported as a fault, indistinguishable in effect
//!   from a transport error, so the sweep moves on to the next endpoint

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Run one RPC attempt under a deadline, flattening the outcome to a
/// printable fault.
pub async fn with_attempt_timeout<T, E, Fut>(limit: Duration, attempt: Fut) -> Result<T, String>
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    match timeout(limit, attempt).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("RPC timeout after {} ms", limit.as_millis())),
    }
}
