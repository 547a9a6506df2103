//! Report tabs: per-category fetch state, the tab coordinator, and its async driver.

mod controller;
mod coordinator;
mod fetch_state;
mod report_model;
mod report_state;
mod reports_traits;

pub use controller::*;
pub use coordinator::*;
pub use fetch_state::*;
pub use report_model::*;
pub use report_state::*;
pub use reports_traits::*;


#[cfg(test)]
mod coordinator_tests;
