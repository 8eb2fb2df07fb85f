//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Contract address must parse and must not be the zero address
//! - Endpoint list must be non-empty and every URL must parse
//! - Timeouts > 0
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use alloy::primitives::Address;
use std::fmt;

use crate::config::schema::ClientConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.contract.address.trim().parse::<Address>() {
        Ok(addr) if addr == Address::ZERO => errors.push(ValidationError {
            field: "contract.address",
            message: "zero address is not a deployed contract".to_string(),
        }),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError {
            field: "contract.address",
            message: format!("invalid address '{}': {}", config.contract.address, e),
        }),
    }

    if config.rpc.urls.is_empty() {
        errors.push(ValidationError {
            field: "rpc.urls",
            message: "at least one RPC URL is required".to_string(),
        });
    }
    for url in &config.rpc.urls {
        if let Err(e) = url.parse::<url::Url>() {
            errors.push(ValidationError {
                field: "rpc.urls",
                message: format!("invalid RPC URL '{}': {}", url, e),
            });
        }
    }

    if config.rpc.attempt_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "rpc.attempt_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }
    if config.writes.receipt_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "writes.receipt_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }
    if config.retries.max_delay_ms < config.retries.base_delay_ms {
        errors.push(ValidationError {
            field: "retries.max_delay_ms",
            message: "must not be smaller than retries.base_delay_ms".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
