//! Paged product browsing with filters and a search override.
//!
//! DESIGN
//! ======
//! The feed is a plain state machine; the async methods at the bottom only
//! fetch a page and hand it to the pure transitions, which is what the tests
//! drive directly.
//!
//! - Browsing: pages of [`PAGE_SIZE`]. The page at offset 0 replaces the list,
//!   later pages append skipping ids already shown. A short page ends the feed.
//! - Filter change: back to offset 0 with `has_more` set, but the current items
//!   stay visible until the replacement page lands.
//! - Search: a non-empty query drops every filter and shows the search results
//!   as returned, unpaginated. Clearing it returns to browsing, which needs a
//!   reload from offset 0.
//!
//! A page answering an offset the feed has since moved away from is dropped.

use std::collections::HashSet;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::types::{Product, ProductQuery, SortOrder};

pub const PAGE_SIZE: u32 = 12;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Condition {
    #[default]
    Any,
    New,
    Used,
}

impl Condition {
    fn as_str(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::New => "new",
            Self::Used => "used",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedFilters {
    pub category: String,
    /// City names, in the order they were picked.
    pub locations: Vec<String>,
    pub condition: Condition,
    /// `None` leaves ordering to the server (newest first).
    pub price_order: Option<SortOrder>,
}

impl FeedFilters {
    /// Add `city` if absent, remove it if present.
    pub fn toggle_location(&mut self, city: &str) {
        if let Some(pos) = self.locations.iter().position(|c| c == city) {
            self.locations.remove(pos);
        } else {
            self.locations.push(city.to_owned());
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug)]
pub struct ProductFeed {
    filters: FeedFilters,
    offset: u32,
    items: Vec<Product>,
    has_more: bool,
    search: Option<String>,
    results: Vec<Product>,
}

impl Default for ProductFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductFeed {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: FeedFilters::default(),
            offset: 0,
            items: Vec::new(),
            has_more: true,
            search: None,
            results: Vec::new(),
        }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// What the user sees: search results while searching, else the browsed list.
    #[must_use]
    pub fn visible(&self) -> &[Product] {
        if self.search.is_some() { &self.results } else { &self.items }
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[must_use]
    pub fn filters(&self) -> &FeedFilters {
        &self.filters
    }

    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Browsing request for the current offset and filters.
    #[must_use]
    pub fn query(&self) -> ProductQuery {
        ProductQuery {
            limit: PAGE_SIZE,
            offset: self.offset,
            orderby: if self.filters.price_order.is_some() { "price".to_owned() } else { String::new() },
            order: self.filters.price_order.unwrap_or(SortOrder::Desc),
            category: self.filters.category.clone(),
            location: self.filters.locations.join(","),
            condition: self.filters.condition.as_str().to_owned(),
        }
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Fold a browsing page fetched at `offset` into the list.
    pub fn apply_page(&mut self, offset: u32, page: Vec<Product>) {
        if self.search.is_some() || offset != self.offset {
            tracing::debug!(offset, current = self.offset, "dropping stale product page");
            return;
        }
        self.has_more = page.len() == PAGE_SIZE as usize;
        if offset == 0 {
            self.items = page;
            return;
        }
        let mut seen: HashSet<String> = self.items.iter().map(|p| p.id.clone()).collect();
        self.items.extend(page.into_iter().filter(|p| seen.insert(p.id.clone())));
    }

    /// Replace the filters. Returns whether anything changed; a change
    /// rewinds to the first page.
    pub fn set_filters(&mut self, filters: FeedFilters) -> bool {
        if filters == self.filters {
            return false;
        }
        self.filters = filters;
        self.offset = 0;
        self.has_more = true;
        true
    }

    /// Advance to the next page and return its request, or `None` when
    /// searching or exhausted.
    pub fn next_page(&mut self) -> Option<ProductQuery> {
        if self.search.is_some() || !self.has_more {
            return None;
        }
        self.offset += PAGE_SIZE;
        Some(self.query())
    }

    /// Enter search mode with `text`. Blank text leaves search mode instead.
    /// Returns the trimmed query to send, if any.
    pub fn begin_search(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            self.clear_search();
            return None;
        }
        self.filters = FeedFilters::default();
        if self.search.as_deref() != Some(text) {
            self.results.clear();
            self.search = Some(text.to_owned());
        }
        Some(text.to_owned())
    }

    /// Show `results` for the search `text`, if it is still the active one.
    pub fn apply_search(&mut self, text: &str, results: Vec<Product>) {
        if self.search.as_deref() == Some(text) {
            self.results = results;
        }
    }

    /// Back to browsing from offset 0. The caller reloads.
    pub fn clear_search(&mut self) {
        self.search = None;
        self.results.clear();
        self.offset = 0;
        self.has_more = true;
    }

    // =========================================================================
    // FETCH
    // =========================================================================

    /// Fetch the first page for the current filters.
    ///
    /// # Errors
    ///
    /// Whatever [`ApiClient::list_products`] returns.
    pub async fn reload(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        if self.search.is_some() {
            return Ok(());
        }
        self.offset = 0;
        self.has_more = true;
        let page = client.list_products(&self.query()).await?;
        self.apply_page(0, page);
        Ok(())
    }

    /// Fetch the next page. Returns `false` without a request when there is
    /// nothing more to load.
    ///
    /// # Errors
    ///
    /// Whatever [`ApiClient::list_products`] returns; the offset is rewound
    /// so the same page can be retried.
    pub async fn load_more(&mut self, client: &ApiClient) -> Result<bool, ApiError> {
        let Some(query) = self.next_page() else {
            return Ok(false);
        };
        match client.list_products(&query).await {
            Ok(page) => {
                self.apply_page(query.offset, page);
                Ok(true)
            }
            Err(e) => {
                self.offset = query.offset.saturating_sub(PAGE_SIZE);
                Err(e)
            }
        }
    }

    /// Search for `text`, or return to browsing when it is blank.
    ///
    /// # Errors
    ///
    /// Whatever the search or reload call returns.
    pub async fn search(&mut self, client: &ApiClient, text: &str) -> Result<(), ApiError> {
        match self.begin_search(text) {
            Some(text) => {
                let results = client.search_products(&text).await?;
                self.apply_search(&text, results);
                Ok(())
            }
            None => self.reload(client).await,
        }
    }
}

#[cfg(test)]
#[path = "feed_test.rs"]
mod tests;
