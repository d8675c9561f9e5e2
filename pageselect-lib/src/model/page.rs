//! Page numbering and the page type returned by sources.

use std::fmt;
use std::num::NonZeroUsize;

use super::Record;
use super::RecordId;

/// A 1-based page number.
///
/// This is the numbering the selection logic and the user see. Providers and
/// paginator widgets that count differently are translated at the edges with
/// [`PageIndexing`] and [`PageNumber::from_paginator_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(NonZeroUsize);

impl PageNumber {
    /// The first page.
    pub const FIRST: PageNumber = PageNumber(NonZeroUsize::MIN);

    /// Creates a page number, or `None` for zero.
    pub fn new(number: usize) -> Option<Self> {
        NonZeroUsize::new(number).map(Self)
    }

    /// Returns the 1-based number.
    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Returns the following page.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the preceding page, or `None` on the first page.
    pub fn prev(self) -> Option<Self> {
        Self::new(self.get() - 1)
    }

    /// Converts a paginator's 0-based page index into a page number.
    ///
    /// A missing index means the paginator is on its first page.
    pub fn from_paginator_index(index: Option<usize>) -> Self {
        match index {
            Some(index) => Self(NonZeroUsize::MIN.saturating_add(index)),
            None => Self::FIRST,
        }
    }

    /// Returns the paginator's 0-based page index for this page.
    pub fn paginator_index(self) -> usize {
        self.get() - 1
    }

    /// Returns the dataset offset of the first row on this page.
    pub fn first_row(self, page_size: NonZeroUsize) -> usize {
        (self.get() - 1).saturating_mul(page_size.get())
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Page indexing convention of a remote provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageIndexing {
    /// The provider's first page is `1`.
    #[default]
    OneBased,
    /// The provider's first page is `0`.
    ZeroBased,
}

impl PageIndexing {
    /// Translates a page number into the provider's page parameter.
    pub fn to_provider(self, page: PageNumber) -> usize {
        match self {
            Self::OneBased => page.get(),
            Self::ZeroBased => page.get() - 1,
        }
    }

    /// Translates the provider's page parameter back into a page number.
    ///
    /// Returns `None` for `0` on a 1-based provider.
    pub fn from_provider(self, provider_page: usize) -> Option<PageNumber> {
        match self {
            Self::OneBased => PageNumber::new(provider_page),
            Self::ZeroBased => PageNumber::new(provider_page.saturating_add(1)),
        }
    }
}

/// Returns the number of pages needed to show `total` records.
pub fn page_count(total: usize, page_size: NonZeroUsize) -> usize {
    total.div_ceil(page_size.get())
}

/// One fetched page of records.
///
/// # Example
///
/// ```
/// use pageselect_lib::model::{Page, PageNumber, Record};
///
/// let page = Page::new(PageNumber::FIRST, vec![Record::new(1u64), Record::new(2u64)])
///     .with_total_count(130_000);
///
/// assert_eq!(page.len(), 2);
/// assert_eq!(page.total_count(), Some(130_000));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    number: PageNumber,
    records: Vec<Record>,
    /// Total record count of the dataset, as reported with this page.
    total_count: Option<usize>,
}

impl Page {
    /// Creates a new page with records.
    pub fn new(number: PageNumber, records: Vec<Record>) -> Self {
        Self {
            number,
            records,
            total_count: None,
        }
    }

    /// Creates an empty page.
    pub fn empty(number: PageNumber) -> Self {
        Self::new(number, Vec::new())
    }

    /// Sets the total record count.
    pub fn with_total_count(mut self, count: usize) -> Self {
        self.total_count = Some(count);
        self
    }

    /// Returns the page number that produced this page.
    pub fn number(&self) -> PageNumber {
        self.number
    }

    /// Returns a reference to the records in this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Returns the identifiers of the records, in page order.
    pub fn ids(&self) -> Vec<RecordId> {
        super::record_ids(&self.records)
    }

    /// Returns the total record count, if the provider reported it.
    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_page_number_rejects_zero() {
        assert_eq!(PageNumber::new(0), None);
        assert_eq!(PageNumber::new(1), Some(PageNumber::FIRST));
    }

    #[test]
    fn test_prev_next() {
        let second = PageNumber::FIRST.next();
        assert_eq!(second.get(), 2);
        assert_eq!(second.prev(), Some(PageNumber::FIRST));
        assert_eq!(PageNumber::FIRST.prev(), None);
    }

    #[test]
    fn test_paginator_translation() {
        assert_eq!(PageNumber::from_paginator_index(None), PageNumber::FIRST);
        assert_eq!(PageNumber::from_paginator_index(Some(0)).get(), 1);
        assert_eq!(PageNumber::from_paginator_index(Some(4)).get(), 5);
        assert_eq!(PageNumber::new(5).unwrap().paginator_index(), 4);
    }

    #[test]
    fn test_first_row() {
        assert_eq!(PageNumber::FIRST.first_row(size(12)), 0);
        assert_eq!(PageNumber::new(3).unwrap().first_row(size(12)), 24);
    }

    #[test]
    fn test_provider_indexing_both_directions() {
        let third = PageNumber::new(3).unwrap();

        assert_eq!(PageIndexing::OneBased.to_provider(third), 3);
        assert_eq!(PageIndexing::ZeroBased.to_provider(third), 2);

        for indexing in [PageIndexing::OneBased, PageIndexing::ZeroBased] {
            let native = indexing.to_provider(third);
            assert_eq!(indexing.from_provider(native), Some(third));
        }

        assert_eq!(PageIndexing::OneBased.from_provider(0), None);
        assert_eq!(PageIndexing::ZeroBased.from_provider(0), Some(PageNumber::FIRST));
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, size(12)), 0);
        assert_eq!(page_count(12, size(12)), 1);
        assert_eq!(page_count(30, size(12)), 3);
    }
}
