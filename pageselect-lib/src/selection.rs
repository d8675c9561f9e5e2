//! The set of selected record identifiers.

use std::collections::HashSet;

use crate::model::Record;
use crate::model::RecordId;

/// Tracks selected records by their identifiers.
///
/// The set spans the whole dataset and is independent of which page is
/// displayed; callers intersect it with the current page's ids to render
/// checkbox states. Every operation is idempotent.
///
/// # Example
///
/// ```
/// use pageselect_lib::model::RecordId;
/// use pageselect_lib::selection::SelectionSet;
///
/// let mut selection = SelectionSet::new();
/// let page = [RecordId(1), RecordId(2), RecordId(3)];
///
/// selection.select_all_on_page(&page, true);
/// assert!(selection.is_full_page_selected(&page));
///
/// selection.toggle(RecordId(2), false);
/// assert!(!selection.is_full_page_selected(&page));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: HashSet<RecordId>,
}

impl SelectionSet {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a record. Returns true if the selection changed.
    pub fn add(&mut self, id: RecordId) -> bool {
        self.selected.insert(id)
    }

    /// Deselects a record. Returns true if the selection changed.
    pub fn remove(&mut self, id: RecordId) -> bool {
        self.selected.remove(&id)
    }

    /// Sets the selection state of a record. Returns true if the selection changed.
    pub fn toggle(&mut self, id: RecordId, desired: bool) -> bool {
        if desired {
            self.add(id)
        } else {
            self.remove(id)
        }
    }

    /// Check if a record is selected.
    pub fn contains(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    /// Selects or deselects every id of a page.
    ///
    /// Ids outside `page_ids` are never touched.
    pub fn select_all_on_page(&mut self, page_ids: &[RecordId], desired: bool) {
        for &id in page_ids {
            self.toggle(id, desired);
        }
    }

    /// Returns true if the page is non-empty and every id on it is selected.
    pub fn is_full_page_selected(&self, page_ids: &[RecordId]) -> bool {
        !page_ids.is_empty() && page_ids.iter().all(|id| self.selected.contains(id))
    }

    /// Selects every record in the slice. Returns how many were newly selected.
    pub fn add_records(&mut self, records: &[Record]) -> usize {
        records.iter().filter(|r| self.selected.insert(r.id)).count()
    }

    /// Number of selected records.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Iterate selected ids in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.selected.iter().copied()
    }

    /// Selected ids in ascending numeric order.
    pub fn sorted(&self) -> Vec<RecordId> {
        let mut ids: Vec<_> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl FromIterator<RecordId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}
