//! Service traits for the reporting backend.

use async_trait::async_trait;

use super::ReportQuery;
use crate::errors::Result;
use crate::pagination::Envelope;
use crate::performance::{AssetGroupPerformance, AssetPerformance, PortfolioPerformance};
use crate::snapshots::{PortfolioSnapshot, SnapshotRecord};

/// Trait defining the reporting data service, one call per report category.
///
/// Paginated categories return an [`Envelope`]; the raw asset snapshot
/// category returns the full flat list and is grouped client-side.
#[async_trait]
pub trait ReportingServiceTrait: Send + Sync {
    /// Portfolio-level snapshot summary rows.
    async fn get_portfolio_snapshots(&self, query: &ReportQuery)
        -> Result<Envelope<PortfolioSnapshot>>;

    /// Portfolio-level performance metrics.
    async fn get_portfolio_performance(
        &self,
        query: &ReportQuery,
    ) -> Result<Envelope<PortfolioPerformance>>;

    /// Performance metrics aggregated per asset type.
    async fn get_asset_group_performance(
        &self,
        query: &ReportQuery,
    ) -> Result<Envelope<AssetGroupPerformance>>;

    /// Performance metrics per individual asset.
    async fn get_asset_performance(&self, query: &ReportQuery)
        -> Result<Envelope<AssetPerformance>>;

    /// Raw per-asset snapshot records (unpaginated).
    async fn get_asset_snapshots(&self, query: &ReportQuery) -> Result<Vec<SnapshotRecord>>;
}
