//! Asset and portfolio reference data used to resolve and validate report rows.

mod catalog_model;
mod catalog_traits;

pub use catalog_model::*;
pub use catalog_traits::*;
