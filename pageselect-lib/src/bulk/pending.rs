//! Per-page selection obligations awaiting a page load.

use std::collections::BTreeMap;

use crate::model::PageNumber;

/// Mapping from page number to the count of leading rows still to be
/// selected when that page loads.
///
/// Every entry's count is at least 1. Entries are removed with [`take`] when
/// discharged, so each page carries at most one obligation at a time.
///
/// [`take`]: PendingSelectionMap::take
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSelectionMap {
    entries: BTreeMap<PageNumber, usize>,
}

impl PendingSelectionMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an obligation for a page, replacing any previous one.
    ///
    /// A zero count removes the entry instead.
    pub(crate) fn insert(&mut self, page: PageNumber, count: usize) {
        if count == 0 {
            self.entries.remove(&page);
        } else {
            self.entries.insert(page, count);
        }
    }

    /// Returns the outstanding count for a page.
    pub fn get(&self, page: PageNumber) -> Option<usize> {
        self.entries.get(&page).copied()
    }

    /// Returns true if the page has an outstanding obligation.
    pub fn contains(&self, page: PageNumber) -> bool {
        self.entries.contains_key(&page)
    }

    /// Removes and returns the obligation for a page.
    pub fn take(&mut self, page: PageNumber) -> Option<usize> {
        self.entries.remove(&page)
    }

    /// Number of pages with an outstanding obligation.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all outstanding counts.
    pub fn total(&self) -> usize {
        self.entries.values().sum()
    }

    /// Iterate entries in ascending page order.
    pub fn iter(&self) -> impl Iterator<Item = (PageNumber, usize)> + '_ {
        self.entries.iter().map(|(&page, &count)| (page, count))
    }

    /// Entries as plain `(page, count)` pairs in ascending page order.
    pub fn to_vec(&self) -> Vec<(usize, usize)> {
        self.iter().map(|(page, count)| (page.get(), count)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize) -> PageNumber {
        PageNumber::new(n).unwrap()
    }

    #[test]
    fn test_take_removes_entry() {
        let mut map = PendingSelectionMap::new();
        map.insert(page(2), 12);

        assert_eq!(map.take(page(2)), Some(12));
        assert_eq!(map.take(page(2)), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_zero_count_is_not_stored() {
        let mut map = PendingSelectionMap::new();
        map.insert(page(1), 5);
        map.insert(page(1), 0);
        assert!(!map.contains(page(1)));
    }

    #[test]
    fn test_iteration_is_page_ordered() {
        let mut map = PendingSelectionMap::new();
        map.insert(page(3), 6);
        map.insert(page(1), 12);
        map.insert(page(2), 12);

        assert_eq!(map.to_vec(), vec![(1, 12), (2, 12), (3, 6)]);
        assert_eq!(map.total(), 30);
    }
}
