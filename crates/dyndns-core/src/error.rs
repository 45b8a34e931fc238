//! Error types for the dyndns system
//!
//! The variants mirror the failure boundaries of an update cycle:
//! discovery and store failures abort the cycle in progress, updater
//! failures are absorbed into per-host outcomes, config failures are
//! surfaced wherever configuration is read.

use thiserror::Error;

/// Result type alias for dyndns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dyndns system
#[derive(Error, Debug)]
pub enum Error {
    /// Public IP discovery failed (unreachable service, timeout, garbage response)
    #[error("IP discovery failed: {0}")]
    Discovery(String),

    /// The DNS updater could not even attempt a provider exchange
    #[error("DNS update failed: {0}")]
    Updater(String),

    /// Persistence layer failure
    #[error("store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O errors from store plumbing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a discovery error
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Create an updater error
    pub fn updater(msg: impl Into<String>) -> Self {
        Self::Updater(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
