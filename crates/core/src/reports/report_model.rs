//! Report categories, queries and payloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;
use crate::pagination::Envelope;
use crate::performance::{AssetGroupPerformance, AssetPerformance, PortfolioPerformance};
use crate::snapshots::{Granularity, PortfolioSnapshot, SnapshotRecord};

/// One report tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReportCategory {
    #[default]
    PortfolioSummary,
    PortfolioPerformance,
    AssetGroupPerformance,
    AssetPerformance,
    RawAssetSnapshots,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 5] = [
        ReportCategory::PortfolioSummary,
        ReportCategory::PortfolioPerformance,
        ReportCategory::AssetGroupPerformance,
        ReportCategory::AssetPerformance,
        ReportCategory::RawAssetSnapshots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportCategory::PortfolioSummary => "portfolio-summary",
            ReportCategory::PortfolioPerformance => "portfolio-performance",
            ReportCategory::AssetGroupPerformance => "asset-group-performance",
            ReportCategory::AssetPerformance => "asset-performance",
            ReportCategory::RawAssetSnapshots => "raw-asset-snapshots",
        }
    }

    /// Whether the server pages this category. Raw snapshots arrive as one list.
    pub fn is_server_paginated(&self) -> bool {
        !matches!(self, ReportCategory::RawAssetSnapshots)
    }
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// User-selected filters shared by every category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilters {
    #[serde(default)]
    pub portfolio_id: Option<String>,
    #[serde(default)]
    pub granularity: Granularity,
}

/// Parameters of one report request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub portfolio_id: Option<String>,
    pub granularity: Granularity,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ReportQuery {
    pub fn unpaged(filters: &ReportFilters) -> Self {
        Self {
            portfolio_id: filters.portfolio_id.clone(),
            granularity: filters.granularity,
            page: None,
            limit: None,
        }
    }

    pub fn paged(filters: &ReportFilters, page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::unpaged(filters)
        }
    }

    /// Query-string pairs in the reporting service's parameter names.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        if let Some(id) = &self.portfolio_id {
            params.push(("portfolioId", id.clone()));
        }
        params.push(("granularity", self.granularity.as_str().to_string()));
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// A load dispatched for one category, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub category: ReportCategory,
    pub seq: u64,
    pub query: ReportQuery,
}

/// Successful response body of a category load.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportPayload {
    PortfolioSummary(Envelope<PortfolioSnapshot>),
    PortfolioPerformance(Envelope<PortfolioPerformance>),
    AssetGroupPerformance(Envelope<AssetGroupPerformance>),
    AssetPerformance(Envelope<AssetPerformance>),
    RawAssetSnapshots(Vec<SnapshotRecord>),
}

impl ReportPayload {
    pub fn category(&self) -> ReportCategory {
        match self {
            ReportPayload::PortfolioSummary(_) => ReportCategory::PortfolioSummary,
            ReportPayload::PortfolioPerformance(_) => ReportCategory::PortfolioPerformance,
            ReportPayload::AssetGroupPerformance(_) => ReportCategory::AssetGroupPerformance,
            ReportPayload::AssetPerformance(_) => ReportCategory::AssetPerformance,
            ReportPayload::RawAssetSnapshots(_) => ReportCategory::RawAssetSnapshots,
        }
    }
}

/// What happened to a response handed to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer request for the same category was issued; the response was dropped.
    Discarded,
}
