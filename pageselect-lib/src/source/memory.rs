//! In-process page source

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;

use super::PagedSource;
use crate::error::FetchError;
use crate::model::Page;
use crate::model::PageNumber;
use crate::model::Record;

/// A page source serving slices of an in-memory record list.
///
/// Useful for demos and tests: it counts fetches and can be primed with
/// failures that are returned, in order, by the next fetches.
///
/// # Example
///
/// ```
/// use pageselect_lib::model::Record;
/// use pageselect_lib::source::InMemorySource;
///
/// let source = InMemorySource::new((1..=30u64).map(Record::new).collect());
/// assert_eq!(source.len(), 30);
/// ```
#[derive(Debug, Default)]
pub struct InMemorySource {
    records: Vec<Record>,
    failures: Mutex<VecDeque<FetchError>>,
    fetches: AtomicUsize,
}

impl InMemorySource {
    /// Creates a source over the given records.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            failures: Mutex::new(VecDeque::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Queues an error to be returned by the next fetch.
    pub fn push_failure(&self, error: FetchError) {
        self.lock_failures().push_back(error);
    }

    /// Number of fetches served so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Number of records in the dataset.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn lock_failures(&self) -> std::sync::MutexGuard<'_, VecDeque<FetchError>> {
        // a poisoned queue still holds valid errors
        self.failures.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PagedSource for InMemorySource {
    async fn fetch_page(&self, page: PageNumber, page_size: NonZeroUsize) -> Result<Page, FetchError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        if let Some(error) = self.lock_failures().pop_front() {
            return Err(error);
        }

        let start = page.first_row(page_size).min(self.records.len());
        let end = start.saturating_add(page_size.get()).min(self.records.len());

        Ok(Page::new(page, self.records[start..end].to_vec()).with_total_count(self.records.len()))
    }
}
