//! Error types for slot storage.

use thiserror::Error;

/// Errors that can occur while reading or writing storage slots.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a valid slot map.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Writing the slot would exceed the storage quota.
    #[error("Storage quota exceeded: {required} bytes required, quota is {quota} bytes")]
    QuotaExceeded {
        /// Total usage the write would have produced.
        required: usize,
        /// Configured quota.
        quota: usize,
    },

    /// The backing file exists but could not be loaded.
    #[error("Storage file is damaged: {0}")]
    Corrupt(String),

    /// Storage cannot be used at all.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
