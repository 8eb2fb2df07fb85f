//! Exponential backoff with jitter between failover sweeps.

use rand::Rng;
use std::time::Duration;

use crate::config::RetryConfig;

/// Delay before starting sweep number `sweep` (1-based count of failed sweeps).
///
/// A zero base delay disables backoff.
pub fn sweep_backoff(sweep: u32, config: &RetryConfig) -> Duration {
    if sweep == 0 || config.base_delay_ms == 0 {
        return Duration::ZERO;
    }

    let exponential_base = 2u64.saturating_pow(sweep - 1);
    let delay_ms = config.base_delay_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(config.max_delay_ms.max(config.base_delay_ms));

    // Up to 10% jitter
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
