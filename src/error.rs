//! Error types for kvcache
//!
//! Provides a unified error type for all client operations.

use thiserror::Error;

/// Result type alias using CacheError
pub type Result<T> = std::result::Result<T, CacheError>;

/// Unified error type for kvcache operations
#[derive(Debug, Error)]
pub enum CacheError {
    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid operation: {0} (expected get, set or del)")]
    InvalidOperation(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Truncated payload: expected {expected} bytes: {source}")]
    TruncatedPayload {
        expected: usize,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Server Errors
    // -------------------------------------------------------------------------
    /// Application-level error reported by the server (e.g. key not found)
    #[error("{0}")]
    ServerFailure(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
