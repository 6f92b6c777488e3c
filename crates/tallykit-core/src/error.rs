//! Core error types for tallykit-core.
//!
//! Nothing in this crate is fatal to the process: decode failures on
//! read recover as empty collections and never appear here. These types
//! cover the remaining failure surface -- writes to the shared store
//! and calls into the commerce capability.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tallykit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Shared-store write errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Commerce capability errors
    #[error("Commerce error: {0}")]
    Commerce(#[from] CommerceError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Shared-store errors. Reads are infallible; only writes and
/// directory setup can fail.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create the shared group directory
    #[error("Failed to create store directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to replace the value under a key
    #[error("Failed to write key '{key}': {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode a value before writing
    #[error("Failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Commerce capability errors. All of these are recoverable: the
/// caller keeps its current entitlement state and may retry later.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product catalog fetch failed
    #[error("Product fetch failed: {0}")]
    ProductFetchFailed(String),

    /// Purchase call failed before producing an outcome
    #[error("Purchase failed: {0}")]
    PurchaseFailed(String),

    /// Entitlement enumeration failed
    #[error("Entitlement enumeration failed: {0}")]
    EntitlementsFailed(String),

    /// Storefront is not reachable at all
    #[error("Storefront unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
