//! Snapfolio Core - Reporting state, snapshot grouping, and service traits.
//!
//! This crate contains the controller logic behind the snapshot and
//! performance reporting views. It is transport-agnostic and defines the
//! traits that are implemented by the `client` crate.

pub mod catalog;
pub mod constants;
pub mod errors;
pub mod grouping;
pub mod pagination;
pub mod performance;
pub mod reports;
pub mod snapshots;

// Re-export common types from snapshot and report modules
pub use snapshots::*;
pub use reports::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
