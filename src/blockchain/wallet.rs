//! Signing capability used for writes.
//!
//! # Security
//! - The session never holds key material; writes go through whatever
//!   [`SigningCapability`] the caller passes in
//! - [`Wallet`] wraps a signer the caller already owns, or one read from the
//!   environment
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::blockchain::types::{ClientError, ClientResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "KEY_MANAGER_PRIVATE_KEY";

/// Something that can authorize and submit transactions.
///
/// The connection it exposes is the one writes are sent through; it must
/// sign with the account returned by [`address`](SigningCapability::address).
pub trait SigningCapability: Send + Sync {
    /// Account that signs and pays for the transaction.
    fn address(&self) -> Address;

    /// Connection bound to the signer.
    fn connection(&self) -> &DynProvider;
}

/// Local signer bound to one RPC endpoint.
#[derive(Clone)]
pub struct Wallet {
    address: Address,
    provider: DynProvider,
}

impl Wallet {
    /// Bind an existing signer to an RPC endpoint.
    pub fn new(signer: PrivateKeySigner, rpc_url: &str) -> ClientResult<Self> {
        let url: url::Url = rpc_url.parse().map_err(|e| {
            ClientError::Configuration(format!("Invalid RPC URL '{}': {}", rpc_url, e))
        })?;
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        tracing::info!(address = %address, "Wallet initialized");
        Ok(Self { address, provider })
    }

    /// Wrap a connection that already signs for `address`.
    pub fn from_provider(address: Address, provider: DynProvider) -> Self {
        Self { address, provider }
    }

    /// Create a wallet from a hex-encoded private key string (with or
    /// without `0x`).
    pub fn from_private_key(private_key_hex: &str, rpc_url: &str) -> ClientResult<Self> {
        let key_hex = private_key_hex
            .strip_prefix("0x")
            .unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex.parse().map_err(|e| {
            ClientError::Configuration(format!("Invalid private key format: {}", e))
        })?;

        Self::new(signer, rpc_url)
    }

    /// Load wallet from `KEY_MANAGER_PRIVATE_KEY`.
    pub fn from_env(rpc_url: &str) -> ClientResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            ClientError::Configuration(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key, rpc_url)
    }
}

impl SigningCapability for Wallet {
    fn address(&self) -> Address {
        self.address
    }

    fn connection(&self) -> &DynProvider {
        &self.provider
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet").field("address", &self.address).finish()
    }
}
