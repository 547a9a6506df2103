use serde::{Deserialize, Serialize};
use snapfolio_core::grouping::GroupKey;

#[derive(Debug, Deserialize)]
pub struct PageBody {
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct LimitBody {
    pub limit: u32,
}

/// New report filters. An omitted portfolio means all portfolios; an omitted
/// granularity keeps the current one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersBody {
    #[serde(default)]
    pub portfolio_id: Option<String>,
    #[serde(default)]
    pub granularity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupKeyBody {
    pub date: String,
    pub asset_type: String,
}

impl From<GroupKeyBody> for GroupKey {
    fn from(body: GroupKeyBody) -> Self {
        GroupKey::new(body.date, body.asset_type)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionResponse {
    /// Whether the toggled group is expanded; for toggle-all, whether everything is.
    pub expanded: bool,
    pub all_expanded: bool,
}
