//! Command executors, one per RPC interaction pattern.

pub mod get;
pub mod set;
pub mod subscribe;
