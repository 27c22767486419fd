//! Error types for memrep
//!
//! Only recoverable conditions live here. Caller bugs (insert after freeze,
//! foreign handles, reading an invalid iterator) panic instead, since the
//! representation cannot be trusted once its contract has been broken.

use thiserror::Error;

/// Result type alias using MemRepError
pub type Result<T> = std::result::Result<T, MemRepError>;

/// Unified error type for memrep operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemRepError {
    // -------------------------------------------------------------------------
    // Factory Errors
    // -------------------------------------------------------------------------
    #[error("Unknown table representation: {0}")]
    UnknownRep(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("Corrupted entry: {0}")]
    Corruption(String),
}
