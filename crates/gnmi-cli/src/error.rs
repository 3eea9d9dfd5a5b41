//! CLI error types.

use std::fmt;

use gnmi_proto::ProtoError;

/// CLI-specific errors. One attempt per invocation; nothing here is
/// retried.
#[derive(Debug)]
pub enum CliError {
    /// Malformed command grammar.
    Usage(String),
    /// Malformed path or value content.
    Validation(ProtoError),
    /// Invalid configuration.
    Config(String),
    /// Device connection failed.
    Connection(String),
    /// A dial or exchange timed out.
    Timeout(String),
    /// Unexpected or undecodable protocol traffic.
    Protocol(String),
    /// The device reported an error inside an otherwise successful exchange.
    Device {
        /// Status code from the device.
        code: u32,
        /// Server-supplied message text.
        message: String,
    },
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage(msg) => write!(f, "{msg}"),
            Self::Validation(e) => write!(f, "{e}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Connection(msg) => write!(f, "connection error: {msg}"),
            Self::Timeout(msg) => write!(f, "timeout: {msg}"),
            Self::Protocol(msg) => write!(f, "protocol error: {msg}"),
            Self::Device { code, message } => {
                write!(f, "device error: {message} (code {code})")
            }
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ProtoError> for CliError {
    fn from(err: ProtoError) -> Self {
        Self::Validation(err)
    }
}
