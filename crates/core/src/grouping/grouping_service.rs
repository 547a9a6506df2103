//! Grouping engine for raw snapshot records.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use super::grouping_model::{DateGroup, GroupKey, GroupNode, GroupedSnapshots};
use crate::catalog::AssetCatalog;
use crate::constants::UNKNOWN_ASSET_TYPE;
use crate::snapshots::{parse_snapshot_date, SnapshotRecord};

/// Resolves the asset type a record is displayed under.
///
/// The record's own type wins, then the catalog entry for its symbol, then
/// the literal `"Unknown"`.
pub fn resolve_asset_type(record: &SnapshotRecord, catalog: &AssetCatalog) -> String {
    record
        .declared_asset_type()
        .or_else(|| catalog.asset_type(&record.asset_symbol))
        .unwrap_or(UNKNOWN_ASSET_TYPE)
        .to_string()
}

/// Groups records by snapshot date, then by resolved asset type.
///
/// Dates are keyed on the raw string and sorted newest first by calendar date;
/// strings that do not start with a `YYYY-MM-DD` date sort after every valid
/// date. Asset types are sorted lexicographically. Member records keep their
/// input order. Calling this twice on the same input yields equal output.
pub fn group_snapshots(records: &[SnapshotRecord], catalog: &AssetCatalog) -> GroupedSnapshots {
    let mut date_order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, BTreeMap<String, Vec<SnapshotRecord>>> = HashMap::new();

    for record in records {
        let asset_type = resolve_asset_type(record, catalog);
        let by_type = buckets
            .entry(record.snapshot_date.clone())
            .or_insert_with(|| {
                date_order.push(record.snapshot_date.clone());
                BTreeMap::new()
            });
        by_type.entry(asset_type).or_default().push(record.clone());
    }

    date_order.sort_by(|a, b| compare_dates_desc(a, b));

    let dates = date_order
        .into_iter()
        .filter_map(|date| {
            let by_type = buckets.remove(&date)?;
            let asset_types = by_type
                .into_iter()
                .map(|(asset_type, members)| {
                    let key = GroupKey::new(date.clone(), asset_type.clone());
                    (asset_type, GroupNode::from_records(key, members))
                })
                .collect();
            Some(DateGroup { date, asset_types })
        })
        .collect();

    GroupedSnapshots::from_dates(dates)
}

fn compare_dates_desc(a: &str, b: &str) -> Ordering {
    match (parse_snapshot_date(a), parse_snapshot_date(b)) {
        (Some(da), Some(db)) => db.cmp(&da).then_with(|| b.cmp(a)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}
