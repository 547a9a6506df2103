//! Grouped snapshot models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::snapshots::SnapshotRecord;

/// Identity of one (date, asset type) group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupKey {
    pub date: String,
    pub asset_type: String,
}

impl GroupKey {
    pub fn new(date: impl Into<String>, asset_type: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            asset_type: asset_type.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.date, self.asset_type)
    }
}

/// Sums decimals, clamping at `Decimal::MAX` / `Decimal::MIN` instead of overflowing.
fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Records sharing a date and asset type, with their rollups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode {
    #[serde(flatten)]
    pub key: GroupKey,
    pub records: Vec<SnapshotRecord>,
    pub total_value: Decimal,
    pub total_pl: Decimal,
    pub total_unrealized_pl: Decimal,
    pub total_realized_pl: Decimal,
    pub total_quantity: Decimal,
    /// `total_value / total_quantity`, or zero when the group holds no units.
    pub average_price: Decimal,
    /// Unweighted mean of the members' return percentages.
    pub average_return: Decimal,
}

impl GroupNode {
    /// Computes the rollups for a non-empty member list.
    pub fn from_records(key: GroupKey, records: Vec<SnapshotRecord>) -> Self {
        let total_value = saturating_sum(records.iter().map(|r| r.current_value));
        let total_pl = saturating_sum(records.iter().map(|r| r.total_pl));
        let total_unrealized_pl = saturating_sum(records.iter().map(|r| r.unrealized_pl));
        let total_realized_pl = saturating_sum(records.iter().map(|r| r.realized_pl));
        let total_quantity = saturating_sum(records.iter().map(|r| r.quantity));

        let average_price = if total_quantity.is_zero() {
            Decimal::ZERO
        } else {
            total_value
                .checked_div(total_quantity)
                .unwrap_or(Decimal::ZERO)
        };

        let return_sum = saturating_sum(records.iter().map(|r| r.return_percentage));
        let average_return = if records.is_empty() {
            Decimal::ZERO
        } else {
            return_sum
                .checked_div(Decimal::from(records.len()))
                .unwrap_or(Decimal::ZERO)
        };

        Self {
            key,
            records,
            total_value,
            total_pl,
            total_unrealized_pl,
            total_realized_pl,
            total_quantity,
            average_price,
            average_return,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// All asset-type groups of one snapshot date, ordered by asset type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateGroup {
    pub date: String,
    pub asset_types: BTreeMap<String, GroupNode>,
}

/// Output of the grouping engine: dates newest first, asset types A to Z within a date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedSnapshots {
    dates: Vec<DateGroup>,
}

impl GroupedSnapshots {
    pub(crate) fn from_dates(dates: Vec<DateGroup>) -> Self {
        Self { dates }
    }

    pub fn dates(&self) -> &[DateGroup] {
        &self.dates
    }

    /// Every group key, in display order.
    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> + '_ {
        self.dates
            .iter()
            .flat_map(|d| d.asset_types.values().map(|g| &g.key))
    }

    /// Number of distinct (date, asset type) keys.
    pub fn key_count(&self) -> usize {
        self.dates.iter().map(|d| d.asset_types.len()).sum()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&GroupNode> {
        self.dates
            .iter()
            .find(|d| d.date == key.date)
            .and_then(|d| d.asset_types.get(&key.asset_type))
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
