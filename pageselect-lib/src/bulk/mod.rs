//! Deferred "select first N" across pages.
//!
//! A bulk request is split into per-page obligations by [`plan_selection`].
//! The page already on screen is handled at once by [`apply_immediate`]; every
//! other page is handled by [`discharge`] when its records arrive.
//!
//! Counts are applied to whatever records a page holds when it is discharged.
//! If the dataset changes between planning and discharge, the rows selected
//! are no longer guaranteed to be the first N; that case is unsupported.

mod pending;

pub use pending::*;

use std::num::NonZeroUsize;

use log::debug;

use crate::model::PageNumber;
use crate::model::Record;
use crate::selection::SelectionSet;

/// Splits a request to select the first `n` records into per-page counts.
///
/// Pages are filled in order starting at page 1, `page_size` rows each, with
/// the remainder on the last page. `n == 0` yields an empty map. The plan does
/// not know the dataset size; use [`plan_within`] to cap it.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
/// use pageselect_lib::bulk::plan_selection;
///
/// let plan = plan_selection(30, NonZeroUsize::new(12).unwrap());
/// assert_eq!(plan.to_vec(), vec![(1, 12), (2, 12), (3, 6)]);
/// ```
pub fn plan_selection(n: usize, page_size: NonZeroUsize) -> PendingSelectionMap {
    let mut map = PendingSelectionMap::new();
    let mut remaining = n;
    let mut page = PageNumber::FIRST;

    while remaining > 0 {
        let count = remaining.min(page_size.get());
        map.insert(page, count);
        remaining -= count;
        page = page.next();
    }

    map
}

/// Plans the first `n` records, capped at the dataset size when it is known.
///
/// With a known total the counts sum to `min(n, total)` and allocations stop at
/// the last page of the dataset. Without one this is [`plan_selection`].
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
/// use pageselect_lib::bulk::plan_within;
///
/// let plan = plan_within(200, NonZeroUsize::new(12).unwrap(), Some(30));
/// assert_eq!(plan.to_vec(), vec![(1, 12), (2, 12), (3, 6)]);
/// ```
pub fn plan_within(n: usize, page_size: NonZeroUsize, known_total: Option<usize>) -> PendingSelectionMap {
    let n = match known_total {
        Some(total) => n.min(total),
        None => n,
    };
    plan_selection(n, page_size)
}

/// Outcome of discharging one page's obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discharge {
    /// The page the obligation was for.
    pub page: PageNumber,
    /// Rows the plan asked for on this page.
    pub requested: usize,
    /// Rows actually selected (less than `requested` on a short page).
    pub selected: usize,
}

impl Discharge {
    /// Returns true if the page held fewer records than requested.
    pub fn truncated(&self) -> bool {
        self.selected < self.requested
    }
}

/// Applies a fresh plan's obligation for the page currently on screen.
///
/// Used right after planning, so the visible page reflects the request
/// without waiting for a reload.
pub fn apply_immediate(
    current_page: PageNumber,
    current_records: &[Record],
    map: &mut PendingSelectionMap,
    selection: &mut SelectionSet,
) -> Option<Discharge> {
    discharge(current_page, current_records, map, selection)
}

/// Discharges the obligation for a page whose records just loaded.
///
/// Selects the leading `count` records and removes the entry, so loading the
/// same page again is a no-op. A page shorter than `count` selects what it has
/// and the rest of the obligation is dropped.
pub fn discharge(
    loaded_page: PageNumber,
    loaded_records: &[Record],
    map: &mut PendingSelectionMap,
    selection: &mut SelectionSet,
) -> Option<Discharge> {
    let requested = map.take(loaded_page)?;
    let rows = &loaded_records[..requested.min(loaded_records.len())];
    selection.add_records(rows);

    let result = Discharge {
        page: loaded_page,
        requested,
        selected: rows.len(),
    };

    if result.truncated() {
        debug!(
            "Page {} held {} of {} requested rows, dropping the rest",
            loaded_page, result.selected, requested
        );
    } else {
        debug!("Discharged {} rows on page {}", requested, loaded_page);
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordId;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn page(n: usize) -> PageNumber {
        PageNumber::new(n).unwrap()
    }

    fn records(ids: std::ops::Range<u64>) -> Vec<Record> {
        ids.map(Record::new).collect()
    }

    #[test]
    fn test_plan_zero_is_empty() {
        assert!(plan_selection(0, size(12)).is_empty());
    }

    #[test]
    fn test_plan_splits_across_pages() {
        let plan = plan_selection(30, size(12));
        assert_eq!(plan.to_vec(), vec![(1, 12), (2, 12), (3, 6)]);
    }

    #[test]
    fn test_plan_exact_multiple() {
        let plan = plan_selection(24, size(12));
        assert_eq!(plan.to_vec(), vec![(1, 12), (2, 12)]);
    }

    #[test]
    fn test_plan_properties() {
        for page_size in [1, 5, 12, 50] {
            for n in 0..=130 {
                let plan = plan_selection(n, size(page_size));
                let pages: Vec<_> = plan.iter().map(|(p, _)| p.get()).collect();

                assert_eq!(plan.total(), n);
                assert_eq!(pages, (1..=n.div_ceil(page_size)).collect::<Vec<_>>());
                assert!(plan.iter().all(|(_, c)| (1..=page_size).contains(&c)));
            }
        }
    }

    #[test]
    fn test_plan_within_known_total() {
        for total in [0, 1, 12, 30, 131] {
            for n in [0, 1, 29, 30, 31, 500, usize::MAX] {
                let plan = plan_within(n, size(12), Some(total));
                assert_eq!(plan.total(), n.min(total));
                assert!(plan.len() <= total.div_ceil(12));
            }
        }
    }

    #[test]
    fn test_plan_within_unknown_total() {
        assert_eq!(plan_within(50, size(12), None), plan_selection(50, size(12)));
    }

    #[test]
    fn test_apply_immediate_selects_leading_rows() {
        let mut map = plan_selection(30, size(12));
        let mut selection = SelectionSet::new();
        let rows = records(0..12);

        let result = apply_immediate(page(1), &rows, &mut map, &mut selection).unwrap();

        assert_eq!(result.selected, 12);
        assert_eq!(selection.len(), 12);
        assert_eq!(map.to_vec(), vec![(2, 12), (3, 6)]);
    }

    #[test]
    fn test_apply_immediate_off_plan_page_is_noop() {
        let mut map = plan_selection(10, size(12));
        let mut selection = SelectionSet::new();

        assert_eq!(apply_immediate(page(4), &records(0..12), &mut map, &mut selection), None);
        assert!(selection.is_empty());
        assert_eq!(map.to_vec(), vec![(1, 10)]);
    }

    #[test]
    fn test_discharge_is_idempotent() {
        let mut map = plan_selection(30, size(12));
        let mut selection = SelectionSet::new();
        let rows = records(100..112);

        assert!(discharge(page(3), &rows, &mut map, &mut selection).is_some());
        let after_first = selection.clone();

        assert!(discharge(page(3), &rows, &mut map, &mut selection).is_none());
        assert_eq!(selection, after_first);
        assert_eq!(selection.sorted(), (100..106).map(RecordId).collect::<Vec<_>>());
    }

    #[test]
    fn test_discharge_truncates_short_page() {
        let mut map = plan_selection(24, size(12));
        let mut selection = SelectionSet::new();

        let result = discharge(page(2), &records(0..5), &mut map, &mut selection).unwrap();

        assert_eq!(result.requested, 12);
        assert_eq!(result.selected, 5);
        assert!(result.truncated());
        assert_eq!(selection.len(), 5);
        assert!(!map.contains(page(2)));
        assert!(!map.contains(page(3)));
    }

    #[test]
    fn test_discharge_empty_page_drops_obligation() {
        let mut map = plan_selection(12, size(12));
        let mut selection = SelectionSet::new();

        let result = discharge(page(1), &[], &mut map, &mut selection).unwrap();
        assert_eq!(result.selected, 0);
        assert!(map.is_empty());
    }
}
