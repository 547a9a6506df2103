//! Per-category report state and the read models exposed to the view layer.

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

use super::{FetchState, ReportCategory, ReportFilters};
use crate::catalog::AssetCatalog;
use crate::grouping::{group_snapshots, ExpansionState, GroupKey, GroupedSnapshots};
use crate::pagination::{Envelope, PaginationState};
use crate::performance::{AssetGroupPerformance, AssetPerformance, PortfolioPerformance};
use crate::snapshots::{PortfolioSnapshot, SnapshotRecord};

/// Non-blocking data quality notice attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReportWarning {
    /// Rows reference portfolios missing from the loaded portfolio list.
    #[serde(rename_all = "camelCase")]
    UnknownPortfolios { portfolio_ids: Vec<String> },
}

/// Builds the unknown-portfolio warning for a set of row portfolio ids.
///
/// Returns nothing until the portfolio list has been loaded.
pub fn unknown_portfolio_warnings<'a>(
    portfolio_ids: impl Iterator<Item = &'a str>,
    known_portfolios: Option<&HashSet<String>>,
) -> Vec<ReportWarning> {
    let Some(known) = known_portfolios else {
        return Vec::new();
    };
    let missing: BTreeSet<&str> = portfolio_ids.filter(|id| !known.contains(*id)).collect();
    if missing.is_empty() {
        return Vec::new();
    }
    vec![ReportWarning::UnknownPortfolios {
        portfolio_ids: missing.into_iter().map(str::to_string).collect(),
    }]
}

/// State of one server-paginated category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedReport<T> {
    pub data: Vec<T>,
    pub fetch: FetchState,
    pub pagination: PaginationState,
    pub warnings: Vec<ReportWarning>,
}

impl<T> PagedReport<T> {
    pub fn new(limit: u32) -> Self {
        Self {
            data: Vec::new(),
            fetch: FetchState::new(),
            pagination: PaginationState::new(limit),
            warnings: Vec::new(),
        }
    }

    /// Replaces rows and pagination wholesale from a server envelope.
    pub(crate) fn apply_envelope(&mut self, envelope: Envelope<T>) {
        let (rows, server) = envelope.normalize(self.pagination.page, self.pagination.limit);
        self.data = rows;
        self.pagination.apply_server_envelope(server);
    }

    /// Loaded without error and without rows.
    pub fn is_empty(&self) -> bool {
        self.fetch.loaded && self.fetch.error.is_none() && self.data.is_empty()
    }
}

/// State of the raw asset snapshot category, grouped client-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotGroupsReport {
    pub records: Vec<SnapshotRecord>,
    pub groups: GroupedSnapshots,
    pub expansion: ExpansionState,
    pub fetch: FetchState,
    pub warnings: Vec<ReportWarning>,
}

impl SnapshotGroupsReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn replace_records(&mut self, records: Vec<SnapshotRecord>, catalog: &AssetCatalog) {
        self.records = records;
        self.regroup(catalog);
    }

    /// Recomputes the grouping from scratch and refreshes the expansion key universe.
    pub(crate) fn regroup(&mut self, catalog: &AssetCatalog) {
        self.groups = group_snapshots(&self.records, catalog);
        self.expansion.sync_keys(&self.groups);
    }

    pub fn is_empty(&self) -> bool {
        self.fetch.loaded && self.fetch.error.is_none() && self.records.is_empty()
    }
}

/// Grouped snapshot data as shown in the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotGroupsView {
    pub record_count: usize,
    pub groups: GroupedSnapshots,
    pub expanded: Vec<GroupKey>,
    pub all_expanded: bool,
}

impl From<&SnapshotGroupsReport> for SnapshotGroupsView {
    fn from(report: &SnapshotGroupsReport) -> Self {
        Self {
            record_count: report.records.len(),
            groups: report.groups.clone(),
            expanded: report.expansion.expanded_keys().cloned().collect(),
            all_expanded: report.expansion.is_all_expanded(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportData {
    PortfolioSummary(Vec<PortfolioSnapshot>),
    PortfolioPerformance(Vec<PortfolioPerformance>),
    AssetGroupPerformance(Vec<AssetGroupPerformance>),
    AssetPerformance(Vec<AssetPerformance>),
    RawAssetSnapshots(SnapshotGroupsView),
}

/// Read model of one category: `{data, loading, error, pagination}` plus warnings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub category: ReportCategory,
    pub active: bool,
    #[serde(flatten)]
    pub fetch: FetchState,
    pub is_empty: bool,
    pub pagination: Option<PaginationState>,
    pub warnings: Vec<ReportWarning>,
    pub data: ReportData,
}

/// Read model of the whole report screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsOverview {
    pub active: ReportCategory,
    pub filters: ReportFilters,
    pub categories: Vec<CategoryView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_portfolio_warning_lists_sorted_distinct_ids() {
        let known: HashSet<String> = ["p-1".to_string()].into_iter().collect();
        let ids = ["p-3", "p-1", "p-2", "p-3"];

        let warnings = unknown_portfolio_warnings(ids.into_iter(), Some(&known));

        assert_eq!(
            warnings,
            vec![ReportWarning::UnknownPortfolios {
                portfolio_ids: vec!["p-2".to_string(), "p-3".to_string()]
            }]
        );
    }

    #[test]
    fn test_no_warning_before_portfolio_list_is_loaded() {
        let warnings = unknown_portfolio_warnings(["p-1"].into_iter(), None);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_warning_serialization() {
        let warning = ReportWarning::UnknownPortfolios {
            portfolio_ids: vec!["p-7".to_string()],
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "unknownPortfolios");
        assert_eq!(json["portfolioIds"][0], "p-7");
    }
}
