//! Snapshot records - point-in-time measurements produced by the reporting service.

mod snapshots_model;

pub use snapshots_model::*;
