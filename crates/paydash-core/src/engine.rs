//! Transaction table engine
//!
//! Holds one fetched record set together with the user's filter, sort and
//! page selection, and derives the visible page from them. Every mutation
//! recomputes the filtered and sorted index list in full, so the derived
//! state is always a pure function of (records, filter, sort).

use paydash_config::Config;
use serde::{Deserialize, Serialize};

use super::filter::{FilterPatch, FilterState};
use super::models::TransactionRecord;
use super::reports::StatusSummary;
use super::sort::SortState;
use super::types::{SortDirection, SortField, TransactionStatus};

/// Current page and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// `max(1, ceil(count / page_size))`
    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size).max(1)
    }

    fn clamp(&mut self, count: usize) {
        self.page = self.page.clamp(1, self.total_pages(count));
    }
}

/// Derived view of the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub page_slice: Vec<TransactionRecord>,
    pub total_filtered: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub sort: SortState,
}

/// Filter and sort selection that survives a refresh or a new login
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewPreferences {
    #[serde(default)]
    pub filter: FilterState,
    #[serde(default)]
    pub sort: SortState,
}

/// Partial [`ViewPreferences`]; absent parts keep their current value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ViewPreferencesUpdate {
    #[serde(default)]
    pub filter: Option<FilterState>,
    #[serde(default)]
    pub sort: Option<SortState>,
}

impl From<ViewPreferences> for ViewPreferencesUpdate {
    fn from(preferences: ViewPreferences) -> Self {
        Self {
            filter: Some(preferences.filter),
            sort: Some(preferences.sort),
        }
    }
}

/// Filter/sort/paginate engine over an in-memory record set
#[derive(Debug, Clone)]
pub struct TableEngine {
    records: Vec<TransactionRecord>,
    filter: FilterState,
    sort: SortState,
    default_sort: SortState,
    page: PageState,
    /// Indices into `records`: the filtered set in sorted order
    visible: Vec<usize>,
}

impl Default for TableEngine {
    fn default() -> Self {
        Self::new(10)
    }
}

impl TableEngine {
    /// Create an empty engine with a fixed page size
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            filter: FilterState::default(),
            sort: SortState::default(),
            default_sort: SortState::default(),
            page: PageState::new(page_size),
            visible: Vec::new(),
        }
    }

    /// Create an engine using the configured page size and initial sort
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pagination.records_per_page).with_default_sort(SortState::new(
            config.ui.default_sort_field,
            config.ui.default_sort_direction,
        ))
    }

    /// Set the sort used initially and restored by [`TableEngine::reset`]
    pub fn with_default_sort(mut self, sort: SortState) -> Self {
        self.default_sort = sort;
        self.sort = sort;
        self.recompute();
        self
    }

    // ==================== Mutations ====================

    /// Replace the whole record set; back to page 1
    pub fn set_records(&mut self, records: Vec<TransactionRecord>) {
        log::debug!("Table records replaced: {} rows", records.len());
        self.records = records;
        self.page.page = 1;
        self.recompute();
    }

    /// Merge a partial filter; back to page 1
    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.filter.merge(patch);
        self.page.page = 1;
        self.recompute();
    }

    /// Flip one status in the selection; back to page 1
    pub fn toggle_status(&mut self, status: TransactionStatus) {
        self.filter.toggle_status(status);
        self.page.page = 1;
        self.recompute();
    }

    /// Flip one school in the selection; back to page 1
    pub fn toggle_school(&mut self, school_id: &str) {
        self.filter.toggle_school(school_id);
        self.page.page = 1;
        self.recompute();
    }

    /// Same field flips direction, another field sorts ascending
    pub fn set_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
        self.recompute();
    }

    /// Set field and direction explicitly
    pub fn set_sort_state(&mut self, sort: SortState) {
        self.sort = sort;
        self.recompute();
    }

    /// Move to page `n` if it exists; returns whether the page changed
    pub fn set_page(&mut self, n: usize) -> bool {
        if n >= 1 && n <= self.total_pages() {
            self.page.page = n;
            true
        } else {
            false
        }
    }

    /// Clear every filter and restore the default sort
    pub fn reset(&mut self) {
        self.filter = FilterState::default();
        self.sort = self.default_sort;
        self.page.page = 1;
        self.recompute();
    }

    /// Restore a saved filter and/or sort
    pub fn restore(&mut self, preferences: impl Into<ViewPreferencesUpdate>) {
        let update = preferences.into();
        if let Some(filter) = update.filter {
            self.filter = filter;
        }
        if let Some(sort) = update.sort {
            self.sort = sort;
        }
        self.page.page = 1;
        self.recompute();
    }

    fn recompute(&mut self) {
        let mut visible = self.filter.apply(&self.records);
        let records = &self.records;
        let sort = self.sort;
        // sort_by is stable, so ties keep fetch order
        visible.sort_by(|&a, &b| sort.compare(&records[a], &records[b]));
        self.visible = visible;
        self.page.clamp(self.visible.len());
        log::debug!(
            "Table recomputed: {}/{} rows visible, sort {} {}, page {}/{}",
            self.visible.len(),
            self.records.len(),
            self.sort.field,
            self.sort.direction,
            self.page.page,
            self.total_pages()
        );
    }

    // ==================== Queries ====================

    /// The current page plus summary counts
    pub fn view(&self) -> TableView {
        let start = (self.page.page - 1) * self.page.page_size;
        let page_slice = self
            .visible
            .iter()
            .skip(start)
            .take(self.page.page_size)
            .map(|&i| self.records[i].clone())
            .collect();

        TableView {
            page_slice,
            total_filtered: self.visible.len(),
            total_pages: self.total_pages(),
            current_page: self.page.page,
            page_size: self.page.page_size,
            sort: self.sort,
        }
    }

    /// Filtered records in sorted order
    pub fn filtered(&self) -> impl Iterator<Item = &TransactionRecord> + '_ {
        self.visible.iter().map(move |&i| &self.records[i])
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn total_filtered(&self) -> usize {
        self.visible.len()
    }

    pub fn total_pages(&self) -> usize {
        self.page.total_pages(self.visible.len())
    }

    pub fn current_page(&self) -> usize {
        self.page.page
    }

    /// Unique non-empty school ids in first-seen order
    pub fn school_ids(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .filter(|r| !r.school_id.is_empty())
            .filter(|r| seen.insert(r.school_id.as_str()))
            .map(|r| r.school_id.clone())
            .collect()
    }

    /// Status counts over every loaded record
    pub fn status_summary(&self) -> StatusSummary {
        StatusSummary::from_records(&self.records)
    }

    /// Status counts over the filtered set
    pub fn filtered_summary(&self) -> StatusSummary {
        StatusSummary::from_records(self.filtered())
    }

    /// Look up a loaded record by collect id or custom order id
    pub fn find(&self, order_id: &str) -> Option<&TransactionRecord> {
        self.records.iter().find(|r| r.is_identified_by(order_id))
    }

    /// Current filter and sort, for persisting
    pub fn snapshot(&self) -> ViewPreferences {
        ViewPreferences {
            filter: self.filter.clone(),
            sort: self.sort,
        }
    }

    /// Whether the table is currently sorted by `field` in `direction`
    pub fn is_sorted_by(&self, field: SortField, direction: SortDirection) -> bool {
        self.sort.field == field && self.sort.direction == direction
    }
}
