//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → consumed once by KeyManager::connect
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a new session is built for new config
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::ContractConfig;
pub use schema::ObservabilityConfig;
pub use schema::RetryConfig;
pub use schema::RpcConfig;
pub use schema::WriteConfig;
pub use validation::{validate_config, ValidationError};
