//! # gnmi-cli
//!
//! Command-line client for a gNMI-style network management service.
//!
//! An invocation performs exactly one of three exchanges against the
//! device: a one-shot `get`, a one-shot `set` built from a queue of
//! mutations, or a long-lived streaming `subscribe`.
//!
//! # Architecture
//!
//! Flag state lives in a [`client::Config`]; the operation tokens are
//! parsed by [`ops::parse_operations`] into an [`ops::Intent`] before
//! anything is dialed; the matching executor in [`commands`] then drives
//! one exchange through the [`client::Gnmi`] trait.
//!
//! ```text
//! tokens ─► ops parser ─► executor ─► Gnmi client ─► device
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod error;
pub mod ops;

pub use cli::{Cli, USAGE};
pub use client::{Config, DeviceClient, Gnmi, SubscribeSession};
pub use error::CliError;
pub use ops::{Intent, OpKind, Operation, parse_operations};
