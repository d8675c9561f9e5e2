//! Table session: the glue between a page source and the selection state.
//!
//! A [`TableSession`] owns the [`SelectionSet`] and the
//! [`PendingSelectionMap`] for one user session. Inbound UI events are method
//! calls; the UI reads page records, loading state and checkbox states back
//! through accessors.
//!
//! Fetches are split into [`TableSession::begin_fetch`] and
//! [`TableSession::complete_fetch`] so overlapping requests can complete in
//! any order. Each ticket carries a generation number and only the latest
//! ticket may change state; older completions are reported as
//! [`FetchOutcome::Stale`] and dropped.

use std::num::NonZeroUsize;

use log::debug;
use log::info;
use log::warn;

use crate::bulk::Discharge;
use crate::bulk::PendingSelectionMap;
use crate::bulk::apply_immediate;
use crate::bulk::discharge;
use crate::bulk::plan_within;
use crate::error::ConfigError;
use crate::error::FetchError;
use crate::model::Page;
use crate::model::PageNumber;
use crate::model::Record;
use crate::model::RecordId;
use crate::model::page_count;
use crate::model::record_ids;
use crate::selection::SelectionSet;
use crate::source::PagedSource;

/// Rows per page when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Fixed page capacity.
    pub page_size: NonZeroUsize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl SessionConfig {
    /// Creates a config with the given page size.
    pub fn new(page_size: usize) -> Result<Self, ConfigError> {
        let page_size = NonZeroUsize::new(page_size).ok_or(ConfigError::ZeroPageSize)?;
        Ok(Self { page_size })
    }
}

/// Identifies one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    page: PageNumber,
    generation: u64,
}

impl FetchTicket {
    /// The page the fetch was issued for.
    pub fn page(&self) -> PageNumber {
        self.page
    }

    /// Monotonic request number within the session.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What a fetch completion did to the session.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The page was installed.
    Loaded {
        /// The page that loaded.
        page: PageNumber,
        /// Number of records on it.
        records: usize,
        /// The pending bulk obligation discharged by this load, if any.
        discharged: Option<Discharge>,
    },
    /// The fetch failed; the page is shown empty and pending obligations stay.
    Failed {
        /// The page that failed to load.
        page: PageNumber,
        /// The error returned by the source.
        error: FetchError,
    },
    /// A newer fetch was issued after this one; the result was dropped.
    Stale {
        /// The page the dropped fetch was for.
        page: PageNumber,
    },
}

impl FetchOutcome {
    /// Returns true if the completion changed the session.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Stale { .. })
    }
}

/// Result of submitting a bulk "select first N" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkSubmission {
    /// Pending entries that were replaced by this request.
    pub superseded: PendingSelectionMap,
    /// Obligation applied at once to the page on screen.
    pub applied: Option<Discharge>,
}

/// Selection state and page state for one user session.
///
/// # Example
///
/// ```ignore
/// let source = InMemorySource::new(records);
/// let mut session = TableSession::new(source, SessionConfig::default());
///
/// session.navigate(PageNumber::FIRST).await;
/// session.submit_bulk(30);
///
/// assert_eq!(session.selected_count(), 12);
/// assert_eq!(session.pending().to_vec(), vec![(2, 12), (3, 6)]);
/// ```
#[derive(Debug)]
pub struct TableSession<S> {
    source: S,
    config: SessionConfig,
    current_page: PageNumber,
    /// Page the `records` belong to; `None` before the first load or after a failure.
    loaded_page: Option<PageNumber>,
    records: Vec<Record>,
    total_count: usize,
    /// Set once a successful load has reported the dataset size.
    total_known: bool,
    loading: bool,
    generation: u64,
    selection: SelectionSet,
    pending: PendingSelectionMap,
}

impl<S> TableSession<S> {
    /// Creates a session with empty selection state.
    pub fn new(source: S, config: SessionConfig) -> Self {
        Self::with_state(source, config, SelectionSet::new(), PendingSelectionMap::new())
    }

    /// Creates a session around existing selection state.
    pub fn with_state(
        source: S,
        config: SessionConfig,
        selection: SelectionSet,
        pending: PendingSelectionMap,
    ) -> Self {
        Self {
            source,
            config,
            current_page: PageNumber::FIRST,
            loaded_page: None,
            records: Vec::new(),
            total_count: 0,
            total_known: false,
            loading: false,
            generation: 0,
            selection,
            pending,
        }
    }

    /// Marks `page` as the navigation target and issues a ticket for its fetch.
    ///
    /// Any ticket issued earlier becomes stale.
    pub fn begin_fetch(&mut self, page: PageNumber) -> FetchTicket {
        self.generation += 1;
        self.current_page = page;
        self.loading = true;
        debug!("Fetching page {} (request {})", page, self.generation);

        FetchTicket {
            page,
            generation: self.generation,
        }
    }

    /// Applies the result of a fetch issued with [`begin_fetch`].
    ///
    /// On success the page is installed and its pending bulk obligation, if
    /// any, is discharged. On failure the page is shown empty, the previous
    /// total count is kept and the obligation stays pending.
    ///
    /// [`begin_fetch`]: TableSession::begin_fetch
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Page, FetchError>) -> FetchOutcome {
        if ticket.generation != self.generation {
            debug!(
                "Dropping stale response for page {} (request {}, latest {})",
                ticket.page, ticket.generation, self.generation
            );
            return FetchOutcome::Stale { page: ticket.page };
        }

        self.loading = false;

        match result {
            Ok(page) => {
                if let Some(total) = page.total_count() {
                    self.total_count = total;
                    self.total_known = true;
                }
                self.records = page.into_records();
                self.loaded_page = Some(ticket.page);

                let discharged = discharge(ticket.page, &self.records, &mut self.pending, &mut self.selection);

                FetchOutcome::Loaded {
                    page: ticket.page,
                    records: self.records.len(),
                    discharged,
                }
            }
            Err(error) => {
                warn!("Failed to fetch page {}: {}", ticket.page, error);
                self.records.clear();
                self.loaded_page = None;

                FetchOutcome::Failed {
                    page: ticket.page,
                    error,
                }
            }
        }
    }

    /// Sets the selection state of one row.
    pub fn toggle_row(&mut self, id: RecordId, desired: bool) -> bool {
        self.selection.toggle(id, desired)
    }

    /// Selects or deselects every row on the current page (header checkbox).
    pub fn set_page_selected(&mut self, desired: bool) {
        let ids = self.page_ids();
        self.selection.select_all_on_page(&ids, desired);
    }

    /// Submits a request to select the first `n` records of the dataset.
    ///
    /// The new plan replaces any pending one; rows selected by earlier plans
    /// stay selected. Once the dataset size is known, `n` is capped at it. If
    /// the current page is loaded, its share is applied at once. `n == 0` does
    /// nothing.
    pub fn submit_bulk(&mut self, n: usize) -> BulkSubmission {
        if n == 0 {
            return BulkSubmission {
                superseded: PendingSelectionMap::new(),
                applied: None,
            };
        }

        let known_total = self.total_known.then_some(self.total_count);
        let plan = plan_within(n, self.config.page_size, known_total);
        info!("Selecting first {} rows across {} pages", n, plan.len());

        let superseded = std::mem::replace(&mut self.pending, plan);
        if !superseded.is_empty() {
            info!("Superseded {} pending pages", superseded.len());
        }

        let applied = match self.loaded_page {
            Some(page) if page == self.current_page && !self.loading => {
                apply_immediate(page, &self.records, &mut self.pending, &mut self.selection)
            }
            _ => None,
        };

        BulkSubmission { superseded, applied }
    }

    /// Deselects everything and drops pending bulk obligations.
    pub fn clear_selection(&mut self) {
        info!("Clearing {} selected rows", self.selection.len());
        self.selection.clear();
        self.pending = PendingSelectionMap::new();
    }

    /// Returns true if the row is selected.
    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selection.contains(id)
    }

    /// Header checkbox state: every row of a non-empty page selected.
    pub fn header_checked(&self) -> bool {
        self.selection.is_full_page_selected(&self.page_ids())
    }

    /// Identifiers of the rows on screen.
    pub fn page_ids(&self) -> Vec<RecordId> {
        record_ids(&self.records)
    }

    /// Records on screen.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns true while the latest fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Total record count from the last successful load.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// The navigation target.
    pub fn current_page(&self) -> PageNumber {
        self.current_page
    }

    /// Number of pages at the configured page size.
    pub fn page_count(&self) -> usize {
        page_count(self.total_count, self.config.page_size)
    }

    /// Configured page size.
    pub fn page_size(&self) -> NonZeroUsize {
        self.config.page_size
    }

    /// Number of selected rows.
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Selected ids in ascending order.
    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selection.sorted()
    }

    /// The selection set.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Outstanding bulk obligations.
    pub fn pending(&self) -> &PendingSelectionMap {
        &self.pending
    }

    /// The page source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: PagedSource> TableSession<S> {
    /// Navigates to `page`, fetching it from the source.
    pub async fn navigate(&mut self, page: PageNumber) -> FetchOutcome {
        let ticket = self.begin_fetch(page);
        let result = self.source.fetch_page(page, self.config.page_size).await;
        self.complete_fetch(ticket, result)
    }

    /// Fetches the current page again.
    pub async fn refresh(&mut self) -> FetchOutcome {
        self.navigate(self.current_page).await
    }

    /// Navigates to the following page, unless the current one is the last.
    pub async fn next_page(&mut self) -> Option<FetchOutcome> {
        let next = self.current_page.next();
        if self.loaded_page.is_some() && next.get() > self.page_count() {
            return None;
        }
        Some(self.navigate(next).await)
    }

    /// Navigates to the preceding page, unless on the first.
    pub async fn prev_page(&mut self) -> Option<FetchOutcome> {
        let prev = self.current_page.prev()?;
        Some(self.navigate(prev).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;

    fn page(n: usize) -> PageNumber {
        PageNumber::new(n).unwrap()
    }

    fn dataset(n: u64) -> Vec<Record> {
        (1..=n).map(|id| Record::new(id).set("title", format!("Artwork {}", id))).collect()
    }

    fn loaded(p: usize, ids: std::ops::RangeInclusive<u64>) -> Page {
        Page::new(page(p), ids.map(Record::new).collect()).with_total_count(100)
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert_eq!(SessionConfig::new(0), Err(ConfigError::ZeroPageSize));
        assert_eq!(SessionConfig::default().page_size.get(), 12);
    }

    #[test]
    fn test_stale_completion_dropped() {
        let mut session = TableSession::new((), SessionConfig::default());

        let first = session.begin_fetch(page(2));
        let second = session.begin_fetch(page(3));

        let outcome = session.complete_fetch(second, Ok(loaded(3, 25..=36)));
        assert!(outcome.is_applied());

        let outcome = session.complete_fetch(first, Ok(loaded(2, 13..=24)));
        assert!(matches!(outcome, FetchOutcome::Stale { page: p } if p == page(2)));

        assert_eq!(session.current_page(), page(3));
        assert_eq!(session.records()[0].id, RecordId(25));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_same_page_refetch_keeps_latest_only() {
        let mut session = TableSession::new((), SessionConfig::default());
        session.submit_bulk(24);

        let old = session.begin_fetch(page(2));
        let new = session.begin_fetch(page(2));

        session.complete_fetch(new, Ok(loaded(2, 13..=24)));
        assert!(!session.complete_fetch(old, Ok(loaded(2, 100..=111))).is_applied());

        assert_eq!(session.selected_ids(), (13..=24).map(RecordId).collect::<Vec<_>>());
    }

    #[test]
    fn test_loading_cleared_only_by_latest() {
        let mut session = TableSession::new((), SessionConfig::default());

        let first = session.begin_fetch(page(1));
        let _second = session.begin_fetch(page(2));

        session.complete_fetch(first, Ok(loaded(1, 1..=12)));
        assert!(session.is_loading());
    }

    #[test]
    fn test_bulk_while_loading_defers_current_page() {
        let mut session = TableSession::new((), SessionConfig::default());
        let ticket = session.begin_fetch(page(1));

        let submission = session.submit_bulk(5);
        assert_eq!(submission.applied, None);
        assert_eq!(session.pending().to_vec(), vec![(1, 5)]);

        session.complete_fetch(ticket, Ok(loaded(1, 1..=12)));
        assert_eq!(session.selected_count(), 5);
        assert!(session.pending().is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_total_and_pending() {
        let source = InMemorySource::new(dataset(30));
        let mut session = TableSession::new(source, SessionConfig::default());

        session.navigate(page(1)).await;
        session.submit_bulk(30);

        session.source().push_failure(FetchError::server(502, "Bad Gateway"));
        let outcome = session.navigate(page(2)).await;

        assert!(matches!(outcome, FetchOutcome::Failed { .. }));
        assert!(session.records().is_empty());
        assert_eq!(session.total_count(), 30);
        assert_eq!(session.pending().to_vec(), vec![(2, 12), (3, 6)]);
        assert!(!session.header_checked());

        session.refresh().await;
        assert_eq!(session.pending().to_vec(), vec![(3, 6)]);
        assert_eq!(session.selected_count(), 24);
    }

    #[tokio::test]
    async fn test_bulk_after_failed_load_stays_pending() {
        let source = InMemorySource::new(dataset(30));
        source.push_failure(FetchError::Unavailable("offline".into()));
        let mut session = TableSession::new(source, SessionConfig::default());

        session.navigate(page(1)).await;
        let submission = session.submit_bulk(3);

        assert_eq!(submission.applied, None);
        assert_eq!(session.pending().to_vec(), vec![(1, 3)]);
    }

    #[tokio::test]
    async fn test_bulk_capped_at_known_total() {
        let source = InMemorySource::new(dataset(30));
        let mut session = TableSession::new(source, SessionConfig::default());
        session.navigate(page(1)).await;

        session.submit_bulk(200);
        assert_eq!(session.pending().to_vec(), vec![(2, 12), (3, 6)]);
        assert_eq!(session.selected_count() + session.pending().total(), 30);

        session.submit_bulk(usize::MAX);
        assert!(session.pending().len() <= session.page_count());
        assert_eq!(session.selected_count() + session.pending().total(), 30);
    }

    #[test]
    fn test_bulk_uncapped_before_total_known() {
        let mut session = TableSession::new((), SessionConfig::default());
        session.submit_bulk(50);
        assert_eq!(session.pending().total(), 50);
    }

    #[tokio::test]
    async fn test_header_checkbox() {
        let source = InMemorySource::new(dataset(30));
        let mut session = TableSession::new(source, SessionConfig::default());
        session.navigate(page(3)).await;

        session.set_page_selected(true);
        assert!(session.header_checked());
        assert_eq!(session.selected_count(), 6);

        session.toggle_row(RecordId(30), false);
        assert!(!session.header_checked());

        session.set_page_selected(false);
        assert_eq!(session.selected_count(), 0);
    }

    #[tokio::test]
    async fn test_next_prev_bounds() {
        let source = InMemorySource::new(dataset(30));
        let mut session = TableSession::new(source, SessionConfig::default());

        assert!(session.prev_page().await.is_none());
        session.navigate(page(3)).await;
        assert!(session.next_page().await.is_none());
        assert!(session.prev_page().await.is_some());
        assert_eq!(session.current_page(), page(2));
        assert_eq!(session.page_count(), 3);
    }

    #[tokio::test]
    async fn test_clear_selection_drops_pending() {
        let source = InMemorySource::new(dataset(30));
        let mut session = TableSession::new(source, SessionConfig::default());
        session.navigate(page(1)).await;
        session.submit_bulk(30);

        session.clear_selection();
        assert_eq!(session.selected_count(), 0);
        assert!(session.pending().is_empty());

        session.navigate(page(2)).await;
        assert_eq!(session.selected_count(), 0);
    }
}
