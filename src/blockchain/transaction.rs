//! State-changing call submission and finality tracking.
//!
//! # Responsibilities
//! - Submit a write exactly once through the signer's own connection
//! - Wait for the configured number of confirmations
//! - Treat a reverted receipt as a failure
//!
//! # Design Decisions
//! - No failover and no retry: resubmitting a transaction risks executing it
//!   twice. The submission closure is `FnOnce` so it cannot be invoked again.

use alloy::network::Ethereum;
use alloy::primitives::TxHash;
use alloy::providers::PendingTransactionBuilder;
use alloy::rpc::types::TransactionReceipt;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::blockchain::types::{ClientError, ClientResult, WriteFault};
use crate::config::ClientConfig;
use crate::observability::metrics;

/// A submitted transaction that has not reached finality yet.
pub trait PendingWrite {
    type Receipt;

    /// Hash of the submitted transaction.
    fn hash(&self) -> TxHash;

    /// Block until the transaction has `confirmations` confirmations, or fail.
    fn finalize(
        self,
        confirmations: u64,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Receipt, WriteFault>> + Send;
}

impl PendingWrite for PendingTransactionBuilder<Ethereum> {
    type Receipt = TransactionReceipt;

    fn hash(&self) -> TxHash {
        *self.tx_hash()
    }

    async fn finalize(
        self,
        confirmations: u64,
        timeout: Duration,
    ) -> Result<TransactionReceipt, WriteFault> {
        let tx_hash = *self.tx_hash();
        let receipt = self
            .with_required_confirmations(confirmations)
            .with_timeout(Some(timeout))
            .get_receipt()
            .await
            .map_err(|e| WriteFault::Confirmation(e.to_string()))?;

        if !receipt.status() {
            return Err(WriteFault::Reverted(tx_hash));
        }
        Ok(receipt)
    }
}

/// Submits state-changing calls and awaits their finality receipt.
#[derive(Debug, Clone)]
pub struct WriteExecutor {
    confirmations: u64,
    receipt_timeout: Duration,
}

impl WriteExecutor {
    pub fn new(confirmations: u64, receipt_timeout: Duration) -> Self {
        Self {
            confirmations,
            receipt_timeout,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.writes.confirmations,
            Duration::from_secs(config.writes.receipt_timeout_secs),
        )
    }

    pub fn confirmations(&self) -> u64 {
        self.confirmations
    }

    /// Submit once via `submit` and wait for finality.
    ///
    /// Any fault, whether rejection, dropped connection, revert or
    /// confirmation timeout, surfaces as [`ClientError::WriteFailure`].
    pub async fn execute<W, E, F, Fut>(
        &self,
        method: &'static str,
        submit: F,
    ) -> ClientResult<W::Receipt>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<W, E>>,
        W: PendingWrite,
        E: Display,
    {
        let pending = match submit().await {
            Ok(pending) => pending,
            Err(e) => {
                metrics::record_write(method, "rejected");
                tracing::error!(method, error = %e, "Transaction submission failed");
                return Err(ClientError::WriteFailure {
                    method,
                    source: WriteFault::Submission(e.to_string()),
                });
            }
        };

        let tx_hash = pending.hash();
        tracing::info!(
            method,
            tx_hash = %tx_hash,
            confirmations = self.confirmations,
            "Transaction submitted, waiting for confirmations"
        );

        match pending
            .finalize(self.confirmations, self.receipt_timeout)
            .await
        {
            Ok(receipt) => {
                metrics::record_write(method, "confirmed");
                tracing::info!(method, tx_hash = %tx_hash, "Transaction confirmed");
                Ok(receipt)
            }
            Err(fault) => {
                let outcome = match fault {
                    WriteFault::Reverted(_) => "reverted",
                    _ => "unconfirmed",
                };
                metrics::record_write(method, outcome);
                tracing::error!(method, tx_hash = %tx_hash, error = %fault, "Transaction failed");
                Err(ClientError::WriteFailure {
                    method,
                    source: fault,
                })
            }
        }
    }
}

impl Default for WriteExecutor {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}
