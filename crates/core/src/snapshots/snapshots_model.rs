//! Snapshot domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::SNAPSHOT_DATE_FORMAT;
use crate::errors::ValidationError;

/// Time resolution of a snapshot series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    pub const ALL: [Granularity; 5] = [
        Granularity::Daily,
        Granularity::Weekly,
        Granularity::Monthly,
        Granularity::Quarterly,
        Granularity::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "DAILY",
            Granularity::Weekly => "WEEKLY",
            Granularity::Monthly => "MONTHLY",
            Granularity::Quarterly => "QUARTERLY",
            Granularity::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Granularity::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownGranularity(s.to_string()))
    }
}

/// Parses the calendar date at the start of a snapshot date string.
///
/// Accepts plain dates (`2024-01-31`) as well as full timestamps
/// (`2024-01-31T00:00:00.000Z`); only the first ten characters are read.
pub fn parse_snapshot_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, SNAPSHOT_DATE_FORMAT).ok()
}

/// Point-in-time measurement for one asset within one portfolio.
///
/// `current_value` is expected to equal `quantity * current_price`; this is
/// not enforced here but the group rollups assume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    #[serde(default)]
    pub portfolio_id: Option<String>,
    /// Raw date string as sent by the reporting service. Grouping keys on it verbatim.
    pub snapshot_date: String,
    #[serde(alias = "symbol")]
    pub asset_symbol: String,
    #[serde(default)]
    pub asset_type: Option<String>,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub current_price: Decimal,
    #[serde(default)]
    pub current_value: Decimal,
    #[serde(default)]
    pub total_pl: Decimal,
    #[serde(default)]
    pub unrealized_pl: Decimal,
    #[serde(default)]
    pub realized_pl: Decimal,
    #[serde(default)]
    pub return_percentage: Decimal,
    #[serde(default)]
    pub granularity: Granularity,
}

impl SnapshotRecord {
    /// The record's own asset type, ignoring blank values.
    pub fn declared_asset_type(&self) -> Option<&str> {
        self.asset_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Aggregated portfolio-level row of the portfolio summary report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub portfolio_id: String,
    #[serde(default)]
    pub portfolio_name: Option<String>,
    pub snapshot_date: String,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default)]
    pub total_value: Decimal,
    #[serde(default)]
    pub total_pl: Decimal,
    #[serde(default)]
    pub unrealized_pl: Decimal,
    #[serde(default)]
    pub realized_pl: Decimal,
    #[serde(default)]
    pub return_percentage: Decimal,
    #[serde(default)]
    pub cash_balance: Decimal,
    #[serde(default)]
    pub asset_count: u32,
}

impl PortfolioSnapshot {
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_snapshot_date(&self.snapshot_date)
    }
}
