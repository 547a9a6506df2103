//! Date and asset-type grouping of raw snapshot records.
//!
//! Turns the flat snapshot stream into a two-level hierarchy with rollups
//! and tracks which groups are expanded in the view.

mod expansion;
mod grouping_model;
mod grouping_service;

pub use expansion::*;
pub use grouping_model::*;
pub use grouping_service::*;
