//! Errors raised while assembling a contract.

use thiserror::Error;

/// Errors that can occur when building configuration or a contract.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Manufacturer identity is empty. Call .manufacturer(name) with a non-empty name")]
    EmptyManufacturer,

    #[error("Transition table has no rules. Add at least one rule or use the standard table")]
    NoRules,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
