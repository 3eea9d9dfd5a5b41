//! # gnmi-proto
//!
//! Message definitions for a gNMI-style network management protocol:
//! hierarchical [`path::Path`]s, the [`value::TypedValue`] tagged union,
//! and the request/response messages for the Get, Set, and Subscribe
//! exchanges.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod messages;
pub mod path;
pub mod value;

pub use error::ProtoError;
pub use messages::{
    GetRequest, GetResponse, Notification, SetRequest, SetResponse, Status, SubscribeRequest,
    SubscribeResponse, Subscription, Update, from_json, status_codes, to_json,
};
pub use path::{Path, PathElem, split_path};
pub use value::{Decimal64, TypedValue};
