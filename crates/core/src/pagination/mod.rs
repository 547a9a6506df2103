//! Page bookkeeping for server-paginated reports.

mod pagination_model;

pub use pagination_model::*;
