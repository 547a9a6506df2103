//! Per-category request sequencing.

use serde::Serialize;

/// Loading/error flags of one category plus the sequence number of its newest request.
///
/// Every dispatched request takes the next sequence number. A response is
/// accepted only if it carries the newest number, so a slow earlier response
/// can never overwrite the result of a later request. Superseded requests are
/// not aborted; their responses are dropped on arrival.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState {
    #[serde(skip)]
    latest_seq: u64,
    pub loading: bool,
    pub error: Option<String>,
    /// At least one response has been applied.
    pub loaded: bool,
    /// The data no longer matches the current filters and must be reloaded.
    pub stale: bool,
}

impl FetchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new request and returns its sequence number.
    pub fn issue(&mut self) -> u64 {
        self.latest_seq += 1;
        self.loading = true;
        self.error = None;
        self.stale = false;
        self.latest_seq
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest_seq
    }

    /// Marks `seq` as successfully completed. Returns `false` if it was superseded.
    pub fn resolve_ok(&mut self, seq: u64) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.loading = false;
        self.error = None;
        self.loaded = true;
        true
    }

    /// Records a failure of `seq`. Returns `false` if it was superseded.
    pub fn resolve_err(&mut self, seq: u64, message: impl Into<String>) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.loading = false;
        self.error = Some(message.into());
        true
    }

    /// Marks the data stale and orphans any in-flight request.
    pub fn invalidate(&mut self) {
        self.latest_seq += 1;
        self.loading = false;
        self.stale = true;
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Whether activating this category should dispatch a load.
    pub fn needs_load(&self) -> bool {
        self.stale || (!self.loaded && !self.loading)
    }
}
