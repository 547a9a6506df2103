use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Asset entry from the asset catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    pub symbol: String,
    #[serde(rename = "type", alias = "assetType", default)]
    pub asset_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Portfolio entry from the portfolio list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Symbol to asset type resolution table.
///
/// Symbols are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetCatalog {
    types: HashMap<String, String>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from catalog entries, skipping assets without a type.
    pub fn from_assets(assets: &[AssetInfo]) -> Self {
        assets
            .iter()
            .filter_map(|a| {
                let asset_type = a.asset_type.as_deref()?.trim();
                if asset_type.is_empty() {
                    return None;
                }
                Some((a.symbol.clone(), asset_type.to_string()))
            })
            .collect()
    }

    pub fn insert(&mut self, symbol: impl AsRef<str>, asset_type: impl Into<String>) {
        self.types
            .insert(symbol.as_ref().to_uppercase(), asset_type.into());
    }

    pub fn asset_type(&self, symbol: &str) -> Option<&str> {
        self.types
            .get(&symbol.trim().to_uppercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<S: AsRef<str>, T: Into<String>> FromIterator<(S, T)> for AssetCatalog {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut catalog = AssetCatalog::new();
        for (symbol, asset_type) in iter {
            catalog.insert(symbol, asset_type);
        }
        catalog
    }
}
