//! Tab/view coordinator owning every report category's state.

use log::{debug, warn};
use std::collections::HashSet;

use super::report_state::unknown_portfolio_warnings;
use super::{
    ApplyOutcome, CategoryView, FetchState, LoadRequest, PagedReport, ReportCategory, ReportData,
    ReportFilters, ReportPayload, ReportQuery, ReportsOverview, SnapshotGroupsReport,
    SnapshotGroupsView,
};
use crate::catalog::{AssetCatalog, PortfolioRef};
use crate::constants::DEFAULT_PAGE_LIMIT;
use crate::errors::Result;
use crate::grouping::GroupKey;
use crate::pagination::PaginationState;
use crate::performance::{AssetGroupPerformance, AssetPerformance, PortfolioPerformance};
use crate::snapshots::PortfolioSnapshot;

/// Single owner of the report screen state.
///
/// Exactly one category is active. Every state transition that needs data
/// returns the [`LoadRequest`]s to dispatch; responses come back through
/// [`ReportsCoordinator::apply`], which drops anything but the newest
/// request of a category. The coordinator performs no I/O itself.
#[derive(Debug, Clone)]
pub struct ReportsCoordinator {
    active: ReportCategory,
    filters: ReportFilters,
    portfolio_summary: PagedReport<PortfolioSnapshot>,
    portfolio_performance: PagedReport<PortfolioPerformance>,
    asset_group_performance: PagedReport<AssetGroupPerformance>,
    asset_performance: PagedReport<AssetPerformance>,
    raw_asset_snapshots: SnapshotGroupsReport,
    asset_catalog: AssetCatalog,
    known_portfolios: Option<HashSet<String>>,
}

impl Default for ReportsCoordinator {
    fn default() -> Self {
        Self::new(ReportFilters::default(), DEFAULT_PAGE_LIMIT)
    }
}

impl ReportsCoordinator {
    /// Creates a coordinator with nothing loaded and the portfolio summary active.
    pub fn new(filters: ReportFilters, default_limit: u32) -> Self {
        Self {
            active: ReportCategory::default(),
            filters,
            portfolio_summary: PagedReport::new(default_limit),
            portfolio_performance: PagedReport::new(default_limit),
            asset_group_performance: PagedReport::new(default_limit),
            asset_performance: PagedReport::new(default_limit),
            raw_asset_snapshots: SnapshotGroupsReport::new(),
            asset_catalog: AssetCatalog::new(),
            known_portfolios: None,
        }
    }

    pub fn active(&self) -> ReportCategory {
        self.active
    }

    pub fn filters(&self) -> &ReportFilters {
        &self.filters
    }

    pub fn portfolio_summary(&self) -> &PagedReport<PortfolioSnapshot> {
        &self.portfolio_summary
    }

    pub fn portfolio_performance(&self) -> &PagedReport<PortfolioPerformance> {
        &self.portfolio_performance
    }

    pub fn asset_group_performance(&self) -> &PagedReport<AssetGroupPerformance> {
        &self.asset_group_performance
    }

    pub fn asset_performance(&self) -> &PagedReport<AssetPerformance> {
        &self.asset_performance
    }

    pub fn raw_asset_snapshots(&self) -> &SnapshotGroupsReport {
        &self.raw_asset_snapshots
    }

    pub fn asset_catalog(&self) -> &AssetCatalog {
        &self.asset_catalog
    }

    pub fn fetch_state(&self, category: ReportCategory) -> &FetchState {
        match category {
            ReportCategory::PortfolioSummary => &self.portfolio_summary.fetch,
            ReportCategory::PortfolioPerformance => &self.portfolio_performance.fetch,
            ReportCategory::AssetGroupPerformance => &self.asset_group_performance.fetch,
            ReportCategory::AssetPerformance => &self.asset_performance.fetch,
            ReportCategory::RawAssetSnapshots => &self.raw_asset_snapshots.fetch,
        }
    }

    fn fetch_state_mut(&mut self, category: ReportCategory) -> &mut FetchState {
        match category {
            ReportCategory::PortfolioSummary => &mut self.portfolio_summary.fetch,
            ReportCategory::PortfolioPerformance => &mut self.portfolio_performance.fetch,
            ReportCategory::AssetGroupPerformance => &mut self.asset_group_performance.fetch,
            ReportCategory::AssetPerformance => &mut self.asset_performance.fetch,
            ReportCategory::RawAssetSnapshots => &mut self.raw_asset_snapshots.fetch,
        }
    }

    /// Pagination of a server-paginated category; `None` for raw snapshots.
    pub fn pagination(&self, category: ReportCategory) -> Option<&PaginationState> {
        match category {
            ReportCategory::PortfolioSummary => Some(&self.portfolio_summary.pagination),
            ReportCategory::PortfolioPerformance => Some(&self.portfolio_performance.pagination),
            ReportCategory::AssetGroupPerformance => {
                Some(&self.asset_group_performance.pagination)
            }
            ReportCategory::AssetPerformance => Some(&self.asset_performance.pagination),
            ReportCategory::RawAssetSnapshots => None,
        }
    }

    fn pagination_mut(&mut self, category: ReportCategory) -> Option<&mut PaginationState> {
        match category {
            ReportCategory::PortfolioSummary => Some(&mut self.portfolio_summary.pagination),
            ReportCategory::PortfolioPerformance => {
                Some(&mut self.portfolio_performance.pagination)
            }
            ReportCategory::AssetGroupPerformance => {
                Some(&mut self.asset_group_performance.pagination)
            }
            ReportCategory::AssetPerformance => Some(&mut self.asset_performance.pagination),
            ReportCategory::RawAssetSnapshots => None,
        }
    }

    fn query_for(&self, category: ReportCategory) -> ReportQuery {
        match self.pagination(category) {
            Some(p) => ReportQuery::paged(&self.filters, p.page, p.limit),
            None => ReportQuery::unpaged(&self.filters),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Issues a new request for `category` with its current pagination.
    pub fn begin_load(&mut self, category: ReportCategory) -> LoadRequest {
        let query = self.query_for(category);
        let seq = self.fetch_state_mut(category).issue();
        debug!("Dispatching {} load #{} ({:?})", category, seq, query);
        LoadRequest {
            category,
            seq,
            query,
        }
    }

    /// Makes `category` the active tab.
    ///
    /// Loads only if the category was never loaded or is stale. In-flight
    /// loads of other categories keep running.
    pub fn activate(&mut self, category: ReportCategory) -> Option<LoadRequest> {
        self.active = category;
        if self.fetch_state(category).needs_load() {
            Some(self.begin_load(category))
        } else {
            None
        }
    }

    /// Requests another page. Page 0 and unpaginated categories are ignored.
    pub fn set_page(&mut self, category: ReportCategory, page: u32) -> Option<LoadRequest> {
        let accepted = self
            .pagination_mut(category)
            .map(|p| p.request_page(page))
            .unwrap_or(false);
        accepted.then(|| self.begin_load(category))
    }

    /// Requests another page size, rewinding to page 1. Limit 0 and unpaginated categories are ignored.
    pub fn set_limit(&mut self, category: ReportCategory, limit: u32) -> Option<LoadRequest> {
        let accepted = self
            .pagination_mut(category)
            .map(|p| p.request_limit(limit))
            .unwrap_or(false);
        accepted.then(|| self.begin_load(category))
    }

    /// Reloads the active category with its current pagination.
    pub fn refresh_active(&mut self) -> LoadRequest {
        self.begin_load(self.active)
    }

    /// Reloads every category regardless of which one is active.
    pub fn refresh_all(&mut self) -> Vec<LoadRequest> {
        ReportCategory::ALL
            .into_iter()
            .map(|category| self.begin_load(category))
            .collect()
    }

    /// Flags a category for reload on its next activation.
    pub fn mark_stale(&mut self, category: ReportCategory) {
        self.fetch_state_mut(category).mark_stale();
    }

    /// Switches portfolio or granularity.
    ///
    /// Every category becomes stale and rewinds to page 1, in-flight loads for
    /// the old filters are orphaned, and the active category reloads. Returns
    /// `None` when the filters did not change.
    pub fn set_filters(&mut self, filters: ReportFilters) -> Option<LoadRequest> {
        if filters == self.filters {
            return None;
        }
        debug!("Report filters changed to {:?}", filters);
        self.filters = filters;
        for category in ReportCategory::ALL {
            if let Some(p) = self.pagination_mut(category) {
                p.rewind();
            }
            self.fetch_state_mut(category).invalidate();
        }
        Some(self.begin_load(self.active))
    }

    /// Applies the outcome of a load.
    ///
    /// Responses for anything but the newest request of `category` are dropped
    /// without touching state. Failures are recorded on the category, never raised.
    pub fn apply(
        &mut self,
        category: ReportCategory,
        seq: u64,
        result: Result<ReportPayload>,
    ) -> ApplyOutcome {
        if !self.fetch_state(category).is_current(seq) {
            debug!(
                "Discarding stale {} response #{} (latest is #{})",
                category,
                seq,
                self.fetch_state(category).latest_seq()
            );
            return ApplyOutcome::Discarded;
        }

        let payload = match result {
            Ok(payload) if payload.category() == category => payload,
            Ok(payload) => {
                let message = format!(
                    "Received {} data for the {} report",
                    payload.category(),
                    category
                );
                warn!("{}", message);
                self.fetch_state_mut(category).resolve_err(seq, message);
                return ApplyOutcome::Applied;
            }
            Err(err) => {
                warn!("Failed to load {} report: {}", category, err);
                self.fetch_state_mut(category).resolve_err(seq, err.to_string());
                return ApplyOutcome::Applied;
            }
        };

        match payload {
            ReportPayload::PortfolioSummary(envelope) => {
                self.portfolio_summary.apply_envelope(envelope);
            }
            ReportPayload::PortfolioPerformance(envelope) => {
                self.portfolio_performance.apply_envelope(envelope);
            }
            ReportPayload::AssetGroupPerformance(envelope) => {
                self.asset_group_performance.apply_envelope(envelope);
            }
            ReportPayload::AssetPerformance(envelope) => {
                self.asset_performance.apply_envelope(envelope);
            }
            ReportPayload::RawAssetSnapshots(records) => {
                self.raw_asset_snapshots
                    .replace_records(records, &self.asset_catalog);
            }
        }
        self.fetch_state_mut(category).resolve_ok(seq);
        self.refresh_warnings(category);
        debug!("Applied {} response #{}", category, seq);
        ApplyOutcome::Applied
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reference data
    // ─────────────────────────────────────────────────────────────────────────

    /// Replaces the asset type resolution table and regroups raw snapshots.
    pub fn set_asset_catalog(&mut self, catalog: AssetCatalog) {
        self.asset_catalog = catalog;
        self.raw_asset_snapshots.regroup(&self.asset_catalog);
    }

    /// Replaces the portfolio list used for cross-reference warnings.
    pub fn set_known_portfolios(&mut self, portfolios: &[PortfolioRef]) {
        self.known_portfolios = Some(portfolios.iter().map(|p| p.id.clone()).collect());
        self.refresh_warnings(ReportCategory::PortfolioSummary);
        self.refresh_warnings(ReportCategory::RawAssetSnapshots);
    }

    fn refresh_warnings(&mut self, category: ReportCategory) {
        let known = self.known_portfolios.as_ref();
        match category {
            ReportCategory::PortfolioSummary => {
                self.portfolio_summary.warnings = unknown_portfolio_warnings(
                    self.portfolio_summary
                        .data
                        .iter()
                        .map(|row| row.portfolio_id.as_str()),
                    known,
                );
            }
            ReportCategory::RawAssetSnapshots => {
                self.raw_asset_snapshots.warnings = unknown_portfolio_warnings(
                    self.raw_asset_snapshots
                        .records
                        .iter()
                        .filter_map(|r| r.portfolio_id.as_deref()),
                    known,
                );
            }
            _ => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expansion
    // ─────────────────────────────────────────────────────────────────────────

    /// Flips one snapshot group. Returns whether it is expanded afterwards.
    pub fn toggle_group(&mut self, key: &GroupKey) -> bool {
        self.raw_asset_snapshots.expansion.toggle_one(key)
    }

    pub fn toggle_all_groups(&mut self) {
        self.raw_asset_snapshots.expansion.toggle_all();
    }

    pub fn all_groups_expanded(&self) -> bool {
        self.raw_asset_snapshots.expansion.is_all_expanded()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read models
    // ─────────────────────────────────────────────────────────────────────────

    pub fn view(&self, category: ReportCategory) -> CategoryView {
        let (data, is_empty, warnings) = match category {
            ReportCategory::PortfolioSummary => (
                ReportData::PortfolioSummary(self.portfolio_summary.data.clone()),
                self.portfolio_summary.is_empty(),
                self.portfolio_summary.warnings.clone(),
            ),
            ReportCategory::PortfolioPerformance => (
                ReportData::PortfolioPerformance(self.portfolio_performance.data.clone()),
                self.portfolio_performance.is_empty(),
                self.portfolio_performance.warnings.clone(),
            ),
            ReportCategory::AssetGroupPerformance => (
                ReportData::AssetGroupPerformance(self.asset_group_performance.data.clone()),
                self.asset_group_performance.is_empty(),
                self.asset_group_performance.warnings.clone(),
            ),
            ReportCategory::AssetPerformance => (
                ReportData::AssetPerformance(self.asset_performance.data.clone()),
                self.asset_performance.is_empty(),
                self.asset_performance.warnings.clone(),
            ),
            ReportCategory::RawAssetSnapshots => (
                ReportData::RawAssetSnapshots(SnapshotGroupsView::from(&self.raw_asset_snapshots)),
                self.raw_asset_snapshots.is_empty(),
                self.raw_asset_snapshots.warnings.clone(),
            ),
        };

        CategoryView {
            category,
            active: category == self.active,
            fetch: self.fetch_state(category).clone(),
            is_empty,
            pagination: self.pagination(category).cloned(),
            warnings,
            data,
        }
    }

    pub fn overview(&self) -> ReportsOverview {
        ReportsOverview {
            active: self.active,
            filters: self.filters.clone(),
            categories: ReportCategory::ALL
                .into_iter()
                .map(|category| self.view(category))
                .collect(),
        }
    }
}
