//! Key identity and token unit layer.
//!
//! # Data Flow
//! ```text
//! secret ──keys.rs──▶ PublicHash (keccak256) ──▶ on-chain lookups
//! key manager ──token.rs──▶ TokenMetadata {address, symbol, decimals} (once per session)
//! raw U256 ◀──units.rs──▶ decimal display string, scaled by decimals
//! ```

pub mod keys;
pub mod token;
pub mod units;

pub use keys::{derive_key_hash, generate_secret, Secret};
pub use token::resolve_token_metadata;
pub use units::{to_display_units, to_raw_units};
