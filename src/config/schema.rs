//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a key manager
//! session. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a key manager session.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Deployed key manager contract.
    pub contract: ContractConfig,

    /// Redundant RPC endpoints and per-attempt limits.
    pub rpc: RpcConfig,

    /// Pacing between failover sweeps.
    pub retries: RetryConfig,

    /// Transaction finality settings.
    pub writes: WriteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Deployed contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the key manager contract (0x-prefixed hex).
    pub address: String,
}

/// RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URLs, tried in this order on every sweep.
    pub urls: Vec<String>,

    /// Timeout for a single RPC attempt in seconds.
    pub attempt_timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            attempt_timeout_secs: 10,
        }
    }
}

/// Backoff applied between full sweeps of the endpoint list.
///
/// A base delay of zero disables the pause entirely.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RetryConfig {
    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

/// Write (transaction) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WriteConfig {
    /// Number of block confirmations required for finality.
    pub confirmations: u64,

    /// Maximum time to wait for a receipt in seconds.
    pub receipt_timeout_secs: u64,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            confirmations: 1,
            receipt_timeout_secs: 120,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
