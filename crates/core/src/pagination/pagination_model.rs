//! Pagination state and the paginated response envelope.

use serde::{Deserialize, Serialize};

/// Paginated response wrapper returned by the reporting service.
///
/// Every metadata field is optional on the wire; [`Envelope::normalize`]
/// fills gaps from the request that produced the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default, alias = "items", alias = "rows")]
    pub data: Vec<T>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub has_next: Option<bool>,
    #[serde(default)]
    pub has_prev: Option<bool>,
}

impl<T> Envelope<T> {
    /// Envelope carrying a complete page with all metadata set.
    pub fn complete(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        let total_pages = total_pages_for(total, limit);
        Self {
            data,
            page: Some(page),
            limit: Some(limit),
            total: Some(total),
            total_pages: Some(total_pages),
            has_next: Some(page < total_pages),
            has_prev: Some(page > 1),
        }
    }

    /// Splits the envelope into its rows and a fully populated pagination state.
    ///
    /// Missing fields fall back to the requested page/limit, the row count,
    /// and flags derived from page and total pages.
    pub fn normalize(self, requested_page: u32, requested_limit: u32) -> (Vec<T>, PaginationState) {
        let limit = self
            .limit
            .filter(|l| *l > 0)
            .unwrap_or_else(|| requested_limit.max(1));
        let page = self
            .page
            .filter(|p| *p > 0)
            .unwrap_or_else(|| requested_page.max(1));
        let total = self.total.unwrap_or(self.data.len() as u64);
        let total_pages = self
            .total_pages
            .unwrap_or_else(|| total_pages_for(total, limit));

        let state = PaginationState {
            page,
            limit,
            total,
            total_pages,
            has_next: self.has_next.unwrap_or(page < total_pages),
            has_prev: self.has_prev.unwrap_or(page > 1),
        };
        (self.data, state)
    }
}

fn total_pages_for(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page/limit/total bookkeeping for one report category.
///
/// `page` and `limit` may be changed locally by a user request; every other
/// field is authoritative only when copied from a server envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationState {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total: 0,
            total_pages: 0,
            has_next: false,
            has_prev: false,
        }
    }

    /// Records a requested page. Returns `false` (and changes nothing) for page 0.
    pub fn request_page(&mut self, page: u32) -> bool {
        if page < 1 {
            return false;
        }
        self.page = page;
        true
    }

    /// Records a requested page size and rewinds to the first page.
    /// Returns `false` (and changes nothing) for a zero limit.
    pub fn request_limit(&mut self, limit: u32) -> bool {
        if limit < 1 {
            return false;
        }
        self.limit = limit;
        self.page = 1;
        true
    }

    /// Replaces every field with the server's view of the page.
    ///
    /// A local page beyond the new `total_pages` is left as-is.
    pub fn apply_server_envelope(&mut self, server: PaginationState) {
        *self = server;
    }

    /// Rewinds to page 1, keeping the page size.
    pub fn rewind(&mut self) {
        self.page = 1;
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_PAGE_LIMIT)
    }
}
