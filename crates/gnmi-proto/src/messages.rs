//! Request and response messages for the Get, Set, and Subscribe exchanges.
//!
//! Messages cross the wire as JSON, one message per transport frame. Each
//! request type has a builder that takes already-split path strings, so the
//! CLI layer never assembles message structs field by field.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ProtoError;
use crate::path::Path;
use crate::value::TypedValue;

/// Serialize a protocol message to its JSON frame body.
pub fn to_json<T: Serialize>(msg: &T) -> Result<String, ProtoError> {
    serde_json::to_string(msg).map_err(|e| ProtoError::Encoding(e.to_string()))
}

/// Deserialize a protocol message from a JSON frame body.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, ProtoError> {
    serde_json::from_str(json).map_err(|e| ProtoError::Decoding(e.to_string()))
}

/// A single value change at a path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    /// Path the value applies to.
    pub path: Path,
    /// Deprecated raw-bytes value (pre-v0.4 wire format). When populated it
    /// takes precedence over `val`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<u8>>,
    /// Typed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val: Option<TypedValue>,
}

impl Update {
    /// Build an update carrying a JSON payload, as used by Set exchanges.
    #[must_use]
    pub fn json(path: Path, payload: impl AsRef<[u8]>) -> Self {
        Self {
            path,
            value: None,
            val: Some(TypedValue::json(payload)),
        }
    }

    /// Decode this update's value to display text.
    ///
    /// Never fails: the legacy raw-bytes field wins when present, an
    /// unrecognized variant renders its placeholder, and a missing value
    /// renders a visible marker.
    #[must_use]
    pub fn display_value(&self) -> String {
        if let Some(raw) = &self.value {
            return String::from_utf8_lossy(raw).into_owned();
        }
        match &self.val {
            Some(val) => val.to_string(),
            None => "[no value]".to_string(),
        }
    }
}

/// A timestamped batch of updates from the device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Device timestamp, nanoseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
    /// Changed values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub update: Vec<Update>,
    /// Deleted paths.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delete: Vec<Path>,
}

/// Request for a one-shot read of one or more paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRequest {
    /// Paths to read.
    pub path: Vec<Path>,
}

impl GetRequest {
    /// Build a request from split path strings.
    ///
    /// Fails with [`ProtoError::Validation`] when no paths were given and
    /// with [`ProtoError::InvalidPath`] when an element is malformed.
    pub fn from_paths(paths: &[Vec<String>]) -> Result<Self, ProtoError> {
        Ok(Self {
            path: build_paths(paths)?,
        })
    }
}

/// Response to a [`GetRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetResponse {
    /// One notification per requested subtree.
    #[serde(default)]
    pub notification: Vec<Notification>,
}

/// Aggregate mutation request: deletes, replaces, and updates for one
/// Set exchange. Order within each list is the operator's encounter order;
/// order across lists is not part of the protocol contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRequest {
    /// Paths to delete.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delete: Vec<Path>,
    /// Values to replace.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replace: Vec<Update>,
    /// Values to merge-update.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub update: Vec<Update>,
}

/// Response to a [`SetRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetResponse {
    /// Overall exchange status. Absent means success on older devices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Status>,
}

/// Status code plus human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Status code; see [`status_codes`].
    pub code: u32,
    /// Server-supplied message text.
    #[serde(default)]
    pub message: String,
}

/// Well-known status codes.
pub mod status_codes {
    /// Success.
    pub const OK: u32 = 0;
    /// Malformed request content.
    pub const INVALID_ARGUMENT: u32 = 3;
    /// Referenced path does not exist.
    pub const NOT_FOUND: u32 = 5;
    /// Operation rejected by the device.
    pub const ABORTED: u32 = 10;
    /// Device-side failure.
    pub const INTERNAL: u32 = 13;
}

/// One streamed subscription within a subscribe request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Path to stream changes for.
    pub path: Path,
}

/// Request opening a streaming subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    /// Subscribed paths.
    pub subscription: Vec<Subscription>,
}

impl SubscribeRequest {
    /// Build a request from split path strings.
    ///
    /// Same validation as [`GetRequest::from_paths`].
    pub fn from_paths(paths: &[Vec<String>]) -> Result<Self, ProtoError> {
        Ok(Self {
            subscription: build_paths(paths)?
                .into_iter()
                .map(|path| Subscription { path })
                .collect(),
        })
    }
}

/// One streamed message within a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubscribeResponse {
    /// A batch of changed values.
    Update {
        /// The notification carrying the changes.
        update: Notification,
    },
    /// Marks the end (or failure) of the initial sync.
    SyncResponse {
        /// True when the initial state snapshot completed.
        sync_response: bool,
    },
    /// Terminal error from the device.
    Error {
        /// The error status.
        error: Status,
    },
}

fn build_paths(paths: &[Vec<String>]) -> Result<Vec<Path>, ProtoError> {
    if paths.is_empty() {
        return Err(ProtoError::Validation("request has no paths".into()));
    }
    paths.iter().map(|p| Path::from_elements(p)).collect()
}
