use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::snapshots::Granularity;

/// Window over which a performance metric is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceHorizon {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "YTD")]
    YearToDate,
}

impl PerformanceHorizon {
    pub const ALL: [PerformanceHorizon; 7] = [
        PerformanceHorizon::OneDay,
        PerformanceHorizon::OneWeek,
        PerformanceHorizon::OneMonth,
        PerformanceHorizon::ThreeMonths,
        PerformanceHorizon::SixMonths,
        PerformanceHorizon::OneYear,
        PerformanceHorizon::YearToDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceHorizon::OneDay => "1D",
            PerformanceHorizon::OneWeek => "1W",
            PerformanceHorizon::OneMonth => "1M",
            PerformanceHorizon::ThreeMonths => "3M",
            PerformanceHorizon::SixMonths => "6M",
            PerformanceHorizon::OneYear => "1Y",
            PerformanceHorizon::YearToDate => "YTD",
        }
    }
}

/// One metric evaluated over every horizon. Missing horizons stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HorizonValues {
    #[serde(rename = "1D", default)]
    pub one_day: Option<Decimal>,
    #[serde(rename = "1W", default)]
    pub one_week: Option<Decimal>,
    #[serde(rename = "1M", default)]
    pub one_month: Option<Decimal>,
    #[serde(rename = "3M", default)]
    pub three_months: Option<Decimal>,
    #[serde(rename = "6M", default)]
    pub six_months: Option<Decimal>,
    #[serde(rename = "1Y", default)]
    pub one_year: Option<Decimal>,
    #[serde(rename = "YTD", default)]
    pub year_to_date: Option<Decimal>,
}

impl HorizonValues {
    pub fn get(&self, horizon: PerformanceHorizon) -> Option<Decimal> {
        match horizon {
            PerformanceHorizon::OneDay => self.one_day,
            PerformanceHorizon::OneWeek => self.one_week,
            PerformanceHorizon::OneMonth => self.one_month,
            PerformanceHorizon::ThreeMonths => self.three_months,
            PerformanceHorizon::SixMonths => self.six_months,
            PerformanceHorizon::OneYear => self.one_year,
            PerformanceHorizon::YearToDate => self.year_to_date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceMetrics {
    /// Time-weighted return
    pub twr: HorizonValues,
    /// Money-weighted return
    pub mwr: HorizonValues,
    /// Internal rate of return
    pub irr: HorizonValues,
    pub alpha: HorizonValues,
    pub beta: HorizonValues,
    pub sharpe_ratio: HorizonValues,
    pub volatility: HorizonValues,
    pub max_drawdown: HorizonValues,
    pub risk_adjusted_return: HorizonValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPerformance {
    pub portfolio_id: String,
    pub snapshot_date: String,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default)]
    pub current_value: Decimal,
    #[serde(default)]
    pub total_pl: Decimal,
    #[serde(flatten)]
    pub metrics: PerformanceMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGroupPerformance {
    pub portfolio_id: String,
    pub snapshot_date: String,
    pub asset_type: String,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default)]
    pub current_value: Decimal,
    #[serde(default)]
    pub total_pl: Decimal,
    #[serde(flatten)]
    pub metrics: PerformanceMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPerformance {
    pub portfolio_id: String,
    pub snapshot_date: String,
    #[serde(alias = "symbol")]
    pub asset_symbol: String,
    #[serde(default)]
    pub asset_type: Option<String>,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub current_value: Decimal,
    #[serde(default)]
    pub total_pl: Decimal,
    #[serde(flatten)]
    pub metrics: PerformanceMetrics,
}
