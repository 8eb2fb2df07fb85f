//! On-chain call execution engine.
//!
//! # Data Flow
//! ```text
//! Configured RPC URLs
//!     → pool.rs (ordered, immutable endpoint connections)
//!     → contracts.rs (typed bindings: address + sol! descriptor + connection)
//!     → query.rs (read-only calls, failover across the pool)
//!     → transaction.rs (writes, submitted once via a signing capability)
//! ```
//!
//! # Security Constraints
//! - Private keys only enter through a caller-supplied signing capability
//! - Never log private keys or secrets
//! - Every read attempt has a deadline

pub mod contracts;
pub mod pool;
pub mod query;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use contracts::{ContractRef, KeyManagerContract, TokenContract};
pub use pool::{Endpoint, ProviderPool};
pub use query::QueryExecutor;
pub use transaction::{PendingWrite, WriteExecutor};
pub use types::{ClientError, ClientResult, KeyInfo, PublicHash, TokenMetadata, WriteFault};
pub use wallet::{SigningCapability, Wallet};
