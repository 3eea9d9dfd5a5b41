//! Error types for the gnmi-proto crate.

use thiserror::Error;

/// Errors that can occur during protocol operations.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// Failed to encode a message.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Failed to decode a message.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// Malformed path element syntax.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Request-level validation error.
    #[error("validation error: {0}")]
    Validation(String),
}
