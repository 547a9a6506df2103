//! Unit tests for the report tab coordinator.

use super::*;
use crate::catalog::{AssetCatalog, PortfolioRef};
use crate::errors::Error;
use crate::grouping::GroupKey;
use crate::pagination::Envelope;
use crate::snapshots::{Granularity, PortfolioSnapshot, SnapshotRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// Fixtures
// ============================================================================

fn summary_row(portfolio_id: &str, date: &str, value: Decimal) -> PortfolioSnapshot {
    PortfolioSnapshot {
        portfolio_id: portfolio_id.to_string(),
        portfolio_name: None,
        snapshot_date: date.to_string(),
        granularity: Granularity::Daily,
        total_value: value,
        total_pl: Decimal::ZERO,
        unrealized_pl: Decimal::ZERO,
        realized_pl: Decimal::ZERO,
        return_percentage: Decimal::ZERO,
        cash_balance: Decimal::ZERO,
        asset_count: 1,
    }
}

fn snapshot(portfolio_id: &str, date: &str, symbol: &str, asset_type: Option<&str>) -> SnapshotRecord {
    SnapshotRecord {
        portfolio_id: Some(portfolio_id.to_string()),
        snapshot_date: date.to_string(),
        asset_symbol: symbol.to_string(),
        asset_type: asset_type.map(str::to_string),
        quantity: dec!(1),
        current_price: dec!(10),
        current_value: dec!(10),
        total_pl: Decimal::ZERO,
        unrealized_pl: Decimal::ZERO,
        realized_pl: Decimal::ZERO,
        return_percentage: Decimal::ZERO,
        granularity: Granularity::Daily,
    }
}

fn summary_page(rows: Vec<PortfolioSnapshot>, page: u32, limit: u32, total: u64) -> Result<ReportPayload, Error> {
    Ok(ReportPayload::PortfolioSummary(Envelope::complete(
        rows, page, limit, total,
    )))
}

fn summary_values(coordinator: &ReportsCoordinator) -> Vec<Decimal> {
    coordinator
        .portfolio_summary()
        .data
        .iter()
        .map(|r| r.total_value)
        .collect()
}

// ============================================================================
// Activation
// ============================================================================

#[test]
fn test_activate_loads_only_first_time() {
    let mut coordinator = ReportsCoordinator::default();

    let request = coordinator
        .activate(ReportCategory::PortfolioPerformance)
        .unwrap();
    assert_eq!(request.category, ReportCategory::PortfolioPerformance);
    assert_eq!(coordinator.active(), ReportCategory::PortfolioPerformance);
    assert!(coordinator.fetch_state(ReportCategory::PortfolioPerformance).loading);

    coordinator.apply(
        request.category,
        request.seq,
        Ok(ReportPayload::PortfolioPerformance(Envelope::complete(
            vec![],
            1,
            10,
            0,
        ))),
    );

    coordinator.activate(ReportCategory::PortfolioSummary);
    assert!(coordinator
        .activate(ReportCategory::PortfolioPerformance)
        .is_none());
}

#[test]
fn test_activate_does_not_duplicate_in_flight_first_load() {
    let mut coordinator = ReportsCoordinator::default();

    assert!(coordinator.activate(ReportCategory::AssetPerformance).is_some());
    coordinator.activate(ReportCategory::PortfolioSummary);
    assert!(coordinator.activate(ReportCategory::AssetPerformance).is_none());
}

#[test]
fn test_activate_reloads_stale_category() {
    let mut coordinator = ReportsCoordinator::default();
    let request = coordinator.activate(ReportCategory::PortfolioSummary).unwrap();
    coordinator.apply(request.category, request.seq, summary_page(vec![], 1, 10, 0));

    coordinator.mark_stale(ReportCategory::PortfolioSummary);

    assert!(coordinator.activate(ReportCategory::PortfolioSummary).is_some());
}

#[test]
fn test_activate_leaves_other_in_flight_loads_running() {
    let mut coordinator = ReportsCoordinator::default();
    let summary = coordinator.activate(ReportCategory::PortfolioSummary).unwrap();

    coordinator.activate(ReportCategory::AssetGroupPerformance);

    // The summary load finishes in the background after the tab switch.
    let outcome = coordinator.apply(
        summary.category,
        summary.seq,
        summary_page(vec![summary_row("p-1", "2024-01-01", dec!(5))], 1, 10, 1),
    );
    assert_eq!(outcome, ApplyOutcome::Applied);
    assert_eq!(summary_values(&coordinator), vec![dec!(5)]);
    assert_eq!(coordinator.active(), ReportCategory::AssetGroupPerformance);
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn test_set_page_dispatches_with_requested_page() {
    let mut coordinator = ReportsCoordinator::default();

    let request = coordinator
        .set_page(ReportCategory::AssetPerformance, 3)
        .unwrap();

    assert_eq!(request.query.page, Some(3));
    assert_eq!(request.query.limit, Some(10));
}

#[test]
fn test_set_page_zero_is_a_no_op() {
    let mut coordinator = ReportsCoordinator::default();
    let before = coordinator.fetch_state(ReportCategory::PortfolioSummary).latest_seq();

    assert!(coordinator.set_page(ReportCategory::PortfolioSummary, 0).is_none());
    assert_eq!(
        coordinator.fetch_state(ReportCategory::PortfolioSummary).latest_seq(),
        before
    );
}

#[test]
fn test_set_limit_resets_page_before_fetch() {
    let mut coordinator = ReportsCoordinator::default();
    let request = coordinator.set_page(ReportCategory::PortfolioSummary, 3).unwrap();
    coordinator.apply(request.category, request.seq, summary_page(vec![], 3, 10, 100));
    assert_eq!(
        coordinator.pagination(ReportCategory::PortfolioSummary).unwrap().page,
        3
    );

    let request = coordinator
        .set_limit(ReportCategory::PortfolioSummary, 50)
        .unwrap();

    assert_eq!(request.query.page, Some(1));
    assert_eq!(request.query.limit, Some(50));
    assert_eq!(
        coordinator.pagination(ReportCategory::PortfolioSummary).unwrap().page,
        1
    );
}

#[test]
fn test_raw_snapshots_are_not_paginated() {
    let mut coordinator = ReportsCoordinator::default();
    assert!(coordinator.pagination(ReportCategory::RawAssetSnapshots).is_none());
    assert!(coordinator.set_page(ReportCategory::RawAssetSnapshots, 2).is_none());
    assert!(coordinator.set_limit(ReportCategory::RawAssetSnapshots, 20).is_none());

    let request = coordinator.activate(ReportCategory::RawAssetSnapshots).unwrap();
    assert_eq!(request.query.page, None);
    assert_eq!(request.query.limit, None);
}

#[test]
fn test_envelope_replaces_pagination() {
    let mut coordinator = ReportsCoordinator::default();
    let request = coordinator.activate(ReportCategory::PortfolioSummary).unwrap();

    coordinator.apply(
        request.category,
        request.seq,
        summary_page(vec![summary_row("p-1", "2024-01-01", dec!(1))], 1, 10, 31),
    );

    let pagination = coordinator.pagination(ReportCategory::PortfolioSummary).unwrap();
    assert_eq!(pagination.total, 31);
    assert_eq!(pagination.total_pages, 4);
    assert!(pagination.has_next);
    assert!(!pagination.has_prev);
}

// ============================================================================
// Sequencing
// ============================================================================

#[test]
fn test_out_of_order_responses_keep_newest_request() {
    let mut coordinator = ReportsCoordinator::default();
    let a = coordinator.set_page(ReportCategory::PortfolioSummary, 2).unwrap();
    let b = coordinator.set_page(ReportCategory::PortfolioSummary, 3).unwrap();

    // B resolves first, then the slower A arrives.
    let b_outcome = coordinator.apply(
        b.category,
        b.seq,
        summary_page(vec![summary_row("p-1", "2024-01-03", dec!(300))], 3, 10, 50),
    );
    let a_outcome = coordinator.apply(
        a.category,
        a.seq,
        summary_page(vec![summary_row("p-1", "2024-01-02", dec!(200))], 2, 10, 50),
    );

    assert_eq!(b_outcome, ApplyOutcome::Applied);
    assert_eq!(a_outcome, ApplyOutcome::Discarded);
    assert_eq!(summary_values(&coordinator), vec![dec!(300)]);
    assert_eq!(
        coordinator.pagination(ReportCategory::PortfolioSummary).unwrap().page,
        3
    );
    assert!(!coordinator.fetch_state(ReportCategory::PortfolioSummary).loading);
}

#[test]
fn test_loading_stays_true_while_newest_request_outstanding() {
    let mut coordinator = ReportsCoordinator::default();
    let a = coordinator.set_page(ReportCategory::PortfolioSummary, 2).unwrap();
    let _b = coordinator.set_page(ReportCategory::PortfolioSummary, 3).unwrap();

    coordinator.apply(a.category, a.seq, summary_page(vec![], 2, 10, 50));

    assert!(coordinator.fetch_state(ReportCategory::PortfolioSummary).loading);
    assert!(coordinator.portfolio_summary().data.is_empty());
}

#[test]
fn test_failure_is_isolated_to_its_category() {
    let mut coordinator = ReportsCoordinator::default();
    let summary = coordinator.activate(ReportCategory::PortfolioSummary).unwrap();
    coordinator.apply(
        summary.category,
        summary.seq,
        summary_page(vec![summary_row("p-1", "2024-01-01", dec!(7))], 1, 10, 1),
    );
    let summary_before = coordinator.view(ReportCategory::PortfolioSummary);
    let perf = coordinator.activate(ReportCategory::AssetPerformance).unwrap();
    let raw = coordinator.begin_load(ReportCategory::RawAssetSnapshots);

    coordinator.apply(
        perf.category,
        perf.seq,
        Err(Error::Transport("connection refused".to_string())),
    );

    let failed = coordinator.fetch_state(ReportCategory::AssetPerformance);
    assert!(!failed.loading);
    assert_eq!(
        failed.error.as_deref(),
        Some("Transport failure: connection refused")
    );

    let mut summary_after = coordinator.view(ReportCategory::PortfolioSummary);
    summary_after.active = summary_before.active;
    assert_eq!(summary_after, summary_before);

    let raw_state = coordinator.fetch_state(ReportCategory::RawAssetSnapshots);
    assert!(raw_state.loading);
    assert_eq!(raw_state.error, None);
    assert!(raw_state.is_current(raw.seq));
}

#[test]
fn test_mismatched_payload_is_recorded_as_error() {
    let mut coordinator = ReportsCoordinator::default();
    let request = coordinator.activate(ReportCategory::PortfolioSummary).unwrap();

    coordinator.apply(
        request.category,
        request.seq,
        Ok(ReportPayload::RawAssetSnapshots(vec![])),
    );

    let state = coordinator.fetch_state(ReportCategory::PortfolioSummary);
    assert!(state.error.is_some());
    assert!(!state.loaded);
}

// ============================================================================
// Refresh
// ============================================================================

#[test]
fn test_refresh_active_uses_current_pagination() {
    let mut coordinator = ReportsCoordinator::default();
    coordinator.activate(ReportCategory::AssetGroupPerformance);
    let paged = coordinator
        .set_page(ReportCategory::AssetGroupPerformance, 4)
        .unwrap();

    let refresh = coordinator.refresh_active();

    assert_eq!(refresh.category, ReportCategory::AssetGroupPerformance);
    assert_eq!(refresh.query.page, Some(4));
    assert!(refresh.seq > paged.seq);
}

#[test]
fn test_refresh_all_issues_one_request_per_category() {
    let mut coordinator = ReportsCoordinator::default();

    let requests = coordinator.refresh_all();

    let categories: Vec<ReportCategory> = requests.iter().map(|r| r.category).collect();
    assert_eq!(categories, ReportCategory::ALL.to_vec());
    for category in ReportCategory::ALL {
        assert!(coordinator.fetch_state(category).loading);
    }
}

#[test]
fn test_refresh_all_supersedes_in_flight_requests() {
    let mut coordinator = ReportsCoordinator::default();
    let old = coordinator.activate(ReportCategory::PortfolioSummary).unwrap();

    let fresh = coordinator.refresh_all();

    assert_eq!(
        coordinator.apply(old.category, old.seq, summary_page(vec![], 1, 10, 0)),
        ApplyOutcome::Discarded
    );
    assert_eq!(
        coordinator.apply(fresh[0].category, fresh[0].seq, summary_page(vec![], 1, 10, 0)),
        ApplyOutcome::Applied
    );
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_set_filters_invalidates_everything_and_reloads_active() {
    let mut coordinator = ReportsCoordinator::default();
    let in_flight = coordinator.set_page(ReportCategory::PortfolioSummary, 5).unwrap();
    coordinator.activate(ReportCategory::AssetPerformance);

    let request = coordinator
        .set_filters(ReportFilters {
            portfolio_id: Some("p-2".to_string()),
            granularity: Granularity::Monthly,
        })
        .unwrap();

    assert_eq!(request.category, ReportCategory::AssetPerformance);
    assert_eq!(request.query.portfolio_id.as_deref(), Some("p-2"));
    assert_eq!(request.query.granularity, Granularity::Monthly);
    assert_eq!(request.query.page, Some(1));

    // The summary request made under the old filters no longer applies.
    assert_eq!(
        coordinator.apply(
            in_flight.category,
            in_flight.seq,
            summary_page(vec![summary_row("p-1", "2024-01-01", dec!(1))], 5, 10, 60)
        ),
        ApplyOutcome::Discarded
    );
    assert!(coordinator.fetch_state(ReportCategory::PortfolioSummary).stale);
    assert_eq!(
        coordinator.pagination(ReportCategory::PortfolioSummary).unwrap().page,
        1
    );

    let reload = coordinator.activate(ReportCategory::PortfolioSummary).unwrap();
    assert_eq!(reload.query.page, Some(1));
}

#[test]
fn test_set_filters_unchanged_is_a_no_op() {
    let mut coordinator = ReportsCoordinator::default();
    assert!(coordinator.set_filters(ReportFilters::default()).is_none());
}

// ============================================================================
// Raw snapshots, catalog and warnings
// ============================================================================

#[test]
fn test_raw_snapshots_are_grouped_on_apply() {
    let mut coordinator = ReportsCoordinator::default();
    let request = coordinator.activate(ReportCategory::RawAssetSnapshots).unwrap();

    coordinator.apply(
        request.category,
        request.seq,
        Ok(ReportPayload::RawAssetSnapshots(vec![
            snapshot("p-1", "2024-01-01", "AAPL", Some("STOCK")),
            snapshot("p-1", "2024-01-01", "MSFT", Some("STOCK")),
            snapshot("p-1", "2024-01-02", "BTC", None),
        ])),
    );

    let report = coordinator.raw_asset_snapshots();
    assert_eq!(report.groups.key_count(), 2);
    assert_eq!(
        report
            .groups
            .get(&GroupKey::new("2024-01-01", "STOCK"))
            .unwrap()
            .total_value,
        dec!(20)
    );
    assert!(report
        .groups
        .get(&GroupKey::new("2024-01-02", "Unknown"))
        .is_some());
}

#[test]
fn test_raw_snapshots_with_huge_values_still_resolve() {
    let mut coordinator = ReportsCoordinator::default();
    let request = coordinator.activate(ReportCategory::RawAssetSnapshots).unwrap();
    let mut a = snapshot("p-1", "2024-01-01", "AAPL", Some("STOCK"));
    a.current_value = Decimal::MAX;
    let mut b = snapshot("p-1", "2024-01-01", "MSFT", Some("STOCK"));
    b.current_value = Decimal::MAX;

    coordinator.apply(
        request.category,
        request.seq,
        Ok(ReportPayload::RawAssetSnapshots(vec![a, b])),
    );

    let state = coordinator.fetch_state(ReportCategory::RawAssetSnapshots);
    assert!(!state.loading);
    assert!(state.error.is_none());
    let report = coordinator.raw_asset_snapshots();
    assert_eq!(report.records.len(), 2);
    assert_eq!(
        report
            .groups
            .get(&GroupKey::new("2024-01-01", "STOCK"))
            .unwrap()
            .total_value,
        Decimal::MAX
    );
}

#[test]
fn test_catalog_change_regroups_and_resyncs_expansion() {
    let mut coordinator = ReportsCoordinator::default();
    let request = coordinator.activate(ReportCategory::RawAssetSnapshots).unwrap();
    coordinator.apply(
        request.category,
        request.seq,
        Ok(ReportPayload::RawAssetSnapshots(vec![
            snapshot("p-1", "2024-01-01", "AAPL", Some("STOCK")),
            snapshot("p-1", "2024-01-01", "BTC", None),
        ])),
    );
    coordinator.toggle_all_groups();
    assert!(coordinator.all_groups_expanded());

    coordinator.set_asset_catalog([("BTC", "CRYPTO")].into_iter().collect::<AssetCatalog>());

    let report = coordinator.raw_asset_snapshots();
    assert!(report
        .groups
        .get(&GroupKey::new("2024-01-01", "CRYPTO"))
        .is_some());
    // The Unknown group vanished and CRYPTO is new and collapsed.
    assert!(!coordinator.all_groups_expanded());
    assert!(coordinator.toggle_group(&GroupKey::new("2024-01-01", "CRYPTO")));
    assert!(coordinator.all_groups_expanded());
}

#[test]
fn test_unknown_portfolio_warning() {
    let mut coordinator = ReportsCoordinator::default();
    coordinator.set_known_portfolios(&[PortfolioRef {
        id: "p-1".to_string(),
        name: Some("Main".to_string()),
    }]);
    let request = coordinator.activate(ReportCategory::PortfolioSummary).unwrap();

    coordinator.apply(
        request.category,
        request.seq,
        summary_page(
            vec![
                summary_row("p-1", "2024-01-01", dec!(1)),
                summary_row("p-404", "2024-01-01", dec!(2)),
            ],
            1,
            10,
            2,
        ),
    );

    let view = coordinator.view(ReportCategory::PortfolioSummary);
    assert_eq!(
        view.warnings,
        vec![ReportWarning::UnknownPortfolios {
            portfolio_ids: vec!["p-404".to_string()]
        }]
    );
    // Warnings never block the data.
    assert_eq!(summary_values(&coordinator).len(), 2);
    assert_eq!(view.fetch.error, None);
}

#[test]
fn test_loading_portfolio_list_reevaluates_warnings() {
    let mut coordinator = ReportsCoordinator::default();
    let request = coordinator.activate(ReportCategory::RawAssetSnapshots).unwrap();
    coordinator.apply(
        request.category,
        request.seq,
        Ok(ReportPayload::RawAssetSnapshots(vec![snapshot(
            "p-9",
            "2024-01-01",
            "AAPL",
            None,
        )])),
    );
    assert!(coordinator.raw_asset_snapshots().warnings.is_empty());

    coordinator.set_known_portfolios(&[]);

    assert_eq!(coordinator.raw_asset_snapshots().warnings.len(), 1);
}

// ============================================================================
// Read models
// ============================================================================

#[test]
fn test_empty_state_after_successful_empty_load() {
    let mut coordinator = ReportsCoordinator::default();
    assert!(!coordinator.view(ReportCategory::PortfolioSummary).is_empty);

    let request = coordinator.activate(ReportCategory::PortfolioSummary).unwrap();
    coordinator.apply(request.category, request.seq, summary_page(vec![], 1, 10, 0));

    let view = coordinator.view(ReportCategory::PortfolioSummary);
    assert!(view.is_empty);
    assert!(view.active);
}

#[test]
fn test_overview_lists_every_category() {
    let coordinator = ReportsCoordinator::default();
    let overview = coordinator.overview();

    assert_eq!(overview.active, ReportCategory::PortfolioSummary);
    assert_eq!(overview.categories.len(), 5);
    assert!(overview.categories[4].pagination.is_none());

    let json = serde_json::to_value(&overview).unwrap();
    assert_eq!(json["active"], "portfolio-summary");
    assert_eq!(json["categories"][0]["loading"], false);
    assert_eq!(json["categories"][0]["pagination"]["page"], 1);
    assert_eq!(json["categories"][4]["data"]["allExpanded"], false);
}
