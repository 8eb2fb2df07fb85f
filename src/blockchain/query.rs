//! Read-only call execution with cross-endpoint failover.
//!
//! # Algorithm
//! ```text
//! cursor = {endpoint 0, 0 failed sweeps}
//! loop:
//!     attempt on endpoints[cursor.endpoint] under the attempt timeout
//!     Ok(v)  → return v        (zero, false and empty values included)
//!     fault  → advance cursor; after MAX_QUERY_SWEEPS failed sweeps → QueryFailure
//! ```

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::blockchain::types::{ClientError, ClientResult};
use crate::config::{ClientConfig, RetryConfig};
use crate::observability::metrics;
use crate::resilience::backoff::sweep_backoff;
use crate::resilience::retries::{Advance, SweepCursor, MAX_QUERY_SWEEPS};
use crate::resilience::timeouts::with_attempt_timeout;

/// Executes read-only calls against an ordered endpoint list.
///
/// Holds only settings; every invocation owns its own attempt state, so one
/// executor can serve any number of concurrent queries.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    attempt_timeout: Duration,
    backoff: RetryConfig,
    max_sweeps: u32,
}

impl QueryExecutor {
    pub fn new(attempt_timeout: Duration, backoff: RetryConfig) -> Self {
        Self {
            attempt_timeout,
            backoff,
            max_sweeps: MAX_QUERY_SWEEPS,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            Duration::from_secs(config.rpc.attempt_timeout_secs),
            config.retries.clone(),
        )
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Run `attempt` against `endpoints` in order until one succeeds or the
    /// retry budget is spent.
    ///
    /// Only an `Err` (or a timeout) counts as a fault. At most
    /// `MAX_QUERY_SWEEPS * endpoints.len()` attempts are made.
    pub async fn execute<'a, P, T, E, F, Fut>(
        &self,
        endpoints: &'a [P],
        method: &'static str,
        mut attempt: F,
    ) -> ClientResult<T>
    where
        F: FnMut(&'a P) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        if endpoints.is_empty() {
            return Err(ClientError::Configuration(
                "no RPC endpoints initialized".to_string(),
            ));
        }

        let mut cursor = SweepCursor::new(endpoints.len(), self.max_sweeps);
        loop {
            let idx = cursor.endpoint();
            match with_attempt_timeout(self.attempt_timeout, attempt(&endpoints[idx])).await {
                Ok(value) => {
                    metrics::record_query_attempt(method, true);
                    tracing::debug!(
                        method,
                        endpoint_idx = idx,
                        sweep = cursor.failed_sweeps(),
                        "Query succeeded"
                    );
                    return Ok(value);
                }
                Err(error) => {
                    metrics::record_query_attempt(method, false);
                    tracing::warn!(
                        method,
                        endpoint_idx = idx,
                        sweep = cursor.failed_sweeps(),
                        error = %error,
                        "RPC error, trying next provider"
                    );

                    match cursor.record_fault() {
                        Advance::NextEndpoint => {}
                        Advance::NewSweep => {
                            let delay = sweep_backoff(cursor.failed_sweeps(), &self.backoff);
                            if !delay.is_zero() {
                                tokio::time::sleep(delay).await;
                            }
                        }
                        Advance::Exhausted => {
                            metrics::record_query_failure(method);
                            tracing::error!(
                                method,
                                attempts = cursor.attempts(),
                                "All RPC providers failed"
                            );
                            return Err(ClientError::QueryFailure {
                                method,
                                attempts: cursor.attempts(),
                                last_error: error,
                            });
                        }
                    }
                }
            }
        }
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Endpoint that either faults every time or answers with a fixed value.
    struct FakeEndpoint {
        name: &'static str,
        answer: Option<u64>,
        calls: AtomicUsize,
    }

    impl FakeEndpoint {
        fn faulty(name: &'static str) -> Self {
            Self {
                name,
                answer: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn answering(name: &'static str, value: u64) -> Self {
            Self {
                name,
                answer: Some(value),
                calls: AtomicUsize::new(0),
            }
        }

        async fn call(&self) -> Result<u64, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.ok_or_else(|| format!("{} unreachable", self.name))
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn test_failover_to_second_endpoint() {
        let endpoints = [FakeEndpoint::faulty("A"), FakeEndpoint::answering("B", 5)];
        let result = QueryExecutor::default()
            .execute(&endpoints, "tierPrice", |e| e.call())
            .await
            .unwrap();

        assert_eq!(result, 5);
        assert_eq!(endpoints[0].calls(), 1);
        assert_eq!(endpoints[1].calls(), 1);
    }

    #[tokio::test]
    async fn test_two_faulty_endpoints_exhaust_after_six_attempts() {
        let endpoints = [FakeEndpoint::faulty("A"), FakeEndpoint::faulty("B")];
        let err = QueryExecutor::default()
            .execute(&endpoints, "tierPrice", |e| e.call())
            .await
            .unwrap_err();

        match err {
            ClientError::QueryFailure {
                method,
                attempts,
                last_error,
            } => {
                assert_eq!(method, "tierPrice");
                assert_eq!(attempts, 6);
                assert_eq!(last_error, "B unreachable");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(endpoints[0].calls(), 3);
        assert_eq!(endpoints[1].calls(), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_is_three_sweeps_for_any_pool_size() {
        for n in 1..=5 {
            let endpoints: Vec<_> = (0..n).map(|_| FakeEndpoint::faulty("X")).collect();
            let result = QueryExecutor::default()
                .execute(&endpoints, "numTiers", |e| e.call())
                .await;

            assert!(result.is_err());
            let total: usize = endpoints.iter().map(FakeEndpoint::calls).sum();
            assert_eq!(total, 3 * n);
        }
    }

    #[tokio::test]
    async fn test_zero_result_is_success() {
        let endpoints = [FakeEndpoint::answering("A", 0), FakeEndpoint::answering("B", 7)];
        let result = QueryExecutor::default()
            .execute(&endpoints, "remainingBalance", |e| e.call())
            .await
            .unwrap();

        assert_eq!(result, 0);
        assert_eq!(endpoints[1].calls(), 0);
    }

    #[tokio::test]
    async fn test_false_result_is_success() {
        let endpoints = ["only"];
        let result = QueryExecutor::default()
            .execute(&endpoints, "isKeyActive", |_| async { Ok::<_, String>(false) })
            .await
            .unwrap();
        assert!(!result);
    }

    #[tokio::test]
    async fn test_strict_order_every_sweep() {
        let endpoints = ["A", "B", "C"];
        let visited = Mutex::new(Vec::new());
        let _ = QueryExecutor::default()
            .execute(&endpoints, "keyInfo", |e| {
                visited.lock().unwrap().push(*e);
                async { Err::<(), _>("down") }
            })
            .await;

        assert_eq!(
            *visited.lock().unwrap(),
            vec!["A", "B", "C", "A", "B", "C", "A", "B", "C"]
        );
    }

    #[tokio::test]
    async fn test_success_on_later_sweep() {
        let endpoints = ["A", "B"];
        let attempts = AtomicUsize::new(0);
        let result = QueryExecutor::default()
            .execute(&endpoints, "symbol", |_| {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 4 {
                        Err("flaky".to_string())
                    } else {
                        Ok("TKN")
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, "TKN");
        assert_eq!(attempts.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_endpoint_counts_as_fault() {
        let endpoints = ["hung", "healthy"];
        let executor = QueryExecutor::new(Duration::from_millis(100), RetryConfig::default());
        let result = executor
            .execute(&endpoints, "decimals", |e| {
                let hung = *e == "hung";
                async move {
                    if hung {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                    }
                    Ok::<_, String>(6u8)
                }
            })
            .await
            .unwrap();

        assert_eq!(result, 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_pauses_between_sweeps() {
        let endpoints = [FakeEndpoint::faulty("A"), FakeEndpoint::faulty("B")];
        let executor = QueryExecutor::new(
            Duration::from_secs(10),
            RetryConfig {
                base_delay_ms: 100,
                max_delay_ms: 100,
            },
        );

        let started = tokio::time::Instant::now();
        let result = executor
            .execute(&endpoints, "tierPrice", |e| e.call())
            .await;
        let elapsed = started.elapsed();

        assert!(result.is_err());
        // Two pauses of 100ms plus up to 10% jitter; none after the last sweep.
        assert!(elapsed >= Duration::from_millis(200), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(220), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_pause_when_backoff_disabled() {
        let endpoints = [FakeEndpoint::faulty("A"), FakeEndpoint::faulty("B")];
        let started = tokio::time::Instant::now();
        let _ = QueryExecutor::default()
            .execute(&endpoints, "tierPrice", |e| e.call())
            .await;

        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_empty_endpoint_list_is_configuration_error() {
        let endpoints: [&str; 0] = [];
        let err = QueryExecutor::default()
            .execute(&endpoints, "erc20", |_| async { Ok::<_, String>(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }
}
