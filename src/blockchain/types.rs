//! Shared types and error definitions.

use alloy::primitives::{Address, TxHash, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// Deterministic one-way digest of a secret, used as the on-chain key.
pub type PublicHash = B256;

/// Why the single submission of a write did not reach finality.
#[derive(Debug, Error)]
pub enum WriteFault {
    /// The signer or node refused the transaction, or the connection dropped.
    #[error("submission rejected: {0}")]
    Submission(String),

    /// The transaction was mined but reverted.
    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    /// Finality could not be observed (timeout or receipt lookup failure).
    #[error("confirmation failed: {0}")]
    Confirmation(String),
}

/// Errors surfaced by a key manager session.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing or invalid session inputs. Never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Every endpoint faulted on every sweep.
    #[error("Query `{method}` failed after {attempts} attempts: {last_error}")]
    QueryFailure {
        method: &'static str,
        attempts: usize,
        last_error: String,
    },

    /// The single write attempt faulted. Never retried.
    #[error("Write `{method}` failed: {source}")]
    WriteFailure {
        method: &'static str,
        #[source]
        source: WriteFault,
    },

    /// The platform randomness source is unavailable.
    #[error("Identity error: {0}")]
    Identity(String),

    /// A token amount could not be converted between unit scales.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        ClientError::Configuration(err.to_string())
    }
}

/// Result type for key manager operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// ERC20 token used by the key manager contract for payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub address: Address,
    pub symbol: String,
    /// Fixed at resolution; never re-fetched during a session.
    pub decimals: u8,
}

/// On-chain record of an API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    /// Activation timestamp.
    pub start: U256,
    /// Expiry timestamp.
    pub expiry: U256,
    /// Last time the used balance was withdrawn or realized.
    pub last_realization: U256,
    pub owner: Address,
    pub tier_id: U256,
}
