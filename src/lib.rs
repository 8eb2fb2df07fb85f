//! Client library for a deployed API key manager contract and its ERC20
//! payment token.
//!
//! # Architecture Overview
//!
//! ```text
//!   application
//!       │
//!       ▼
//!  ┌──────────────────────────── KeyManager (session) ───────────────────────────┐
//!  │                                                                             │
//!  │   reads ──▶ QueryExecutor ──▶ ProviderPool [rpc 0, rpc 1, ... rpc n]        │
//!  │              (3 sweeps, in order,                                           │
//!  │               per-attempt timeout)                                          │
//!  │                                                                             │
//!  │   writes ─▶ WriteExecutor ──▶ SigningCapability connection (once)           │
//!  │                                                                             │
//!  │   identity: secret ─keccak256─▶ PublicHash                                  │
//!  │   units:    U256 base units ◀──▶ decimal display units (TokenMetadata)      │
//!  └─────────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod blockchain;
pub mod config;
pub mod identity;
pub mod observability;
pub mod resilience;
pub mod session;

pub use blockchain::{ClientError, ClientResult, SigningCapability, Wallet};
pub use config::ClientConfig;
pub use session::KeyManager;
