//! Error types for Qiita Bridge.

use thiserror::Error;

/// Main error type for Qiita Bridge operations.
///
/// RPC round-trips never produce this type - the client converts every
/// transport failure into an [`crate::RpcEnvelope`] error value. This enum
/// covers the fallible paths around the RPC surface: configuration, client
/// construction, and result-payload decoding.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server base address is not a usable URL
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidServerUrl {
        /// The rejected URL string
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// A result payload did not match the expected schema for its method
    #[error("Malformed result payload: {0}")]
    MalformedPayload(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
