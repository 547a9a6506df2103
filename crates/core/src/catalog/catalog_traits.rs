//! Service traits for reference data.

use async_trait::async_trait;

use super::{AssetInfo, PortfolioRef};
use crate::errors::Result;

/// Trait for fetching reference data from the reporting backend.
#[async_trait]
pub trait CatalogServiceTrait: Send + Sync {
    /// List every known asset with its type tag.
    async fn list_assets(&self) -> Result<Vec<AssetInfo>>;

    /// List every portfolio the user can report on.
    async fn list_portfolios(&self) -> Result<Vec<PortfolioRef>>;
}
