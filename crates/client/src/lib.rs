//! Snapfolio Client - HTTP access to the reporting API.
//!
//! Implements the reporting and catalog service traits defined in
//! `snapfolio-core` over `reqwest`, with bounded retry for transient failures.

pub mod client;
pub mod config;
pub mod retry;

pub use client::ReportingApiClient;
pub use config::{ReportingClientConfig, RetryPolicy, DEFAULT_REPORTING_API_URL};
pub use retry::with_retry;
