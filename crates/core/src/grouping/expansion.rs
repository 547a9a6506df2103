//! Expand/collapse state of the grouped snapshot view.

use serde::Serialize;
use std::collections::BTreeSet;

use super::grouping_model::{GroupKey, GroupedSnapshots};

/// Set of expanded groups plus the universe of keys they are drawn from.
///
/// The universe is replaced eagerly through [`ExpansionState::sync_keys`]
/// whenever the grouping output changes, so toggles never see a stale key set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionState {
    expanded: BTreeSet<GroupKey>,
    #[serde(skip)]
    known_keys: BTreeSet<GroupKey>,
    all_expanded: bool,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the key universe with the keys of `groups`.
    ///
    /// Expanded keys that still exist stay expanded; keys that disappeared are dropped.
    pub fn sync_keys(&mut self, groups: &GroupedSnapshots) {
        self.known_keys = groups.keys().cloned().collect();
        let known = &self.known_keys;
        self.expanded.retain(|k| known.contains(k));
        self.recompute_all_expanded();
    }

    /// Flips one group. Returns whether the group is expanded afterwards.
    ///
    /// Keys outside the current universe are ignored.
    pub fn toggle_one(&mut self, key: &GroupKey) -> bool {
        if !self.known_keys.contains(key) {
            return false;
        }
        let expanded = if self.expanded.remove(key) {
            false
        } else {
            self.expanded.insert(key.clone());
            true
        };
        self.recompute_all_expanded();
        expanded
    }

    /// Collapses everything when all groups are expanded, otherwise expands everything.
    pub fn toggle_all(&mut self) {
        if self.all_expanded {
            self.expanded.clear();
        } else {
            self.expanded = self.known_keys.clone();
        }
        self.recompute_all_expanded();
    }

    pub fn is_all_expanded(&self) -> bool {
        self.all_expanded
    }

    pub fn is_expanded(&self, key: &GroupKey) -> bool {
        self.expanded.contains(key)
    }

    pub fn expanded_keys(&self) -> impl Iterator<Item = &GroupKey> + '_ {
        self.expanded.iter()
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    pub fn known_key_count(&self) -> usize {
        self.known_keys.len()
    }

    // An empty view is never "all expanded".
    fn recompute_all_expanded(&mut self) {
        self.all_expanded =
            !self.known_keys.is_empty() && self.expanded.len() == self.known_keys.len();
    }
}
