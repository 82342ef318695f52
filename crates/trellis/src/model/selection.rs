//! Row selection state for item views.
//!
//! The boundary exposes selection by logical row only, so this model tracks
//! selected rows rather than full index selections. One selection model
//! exists per view binding; the bridge mutates it through
//! `set_item_selection` and `clear_selection`.

use std::collections::BTreeSet;

use parking_lot::Mutex;
use trellis_core::Signal;

/// Per-view row selection state.
pub struct SelectionModel {
    rows: Mutex<BTreeSet<usize>>,
    /// Emitted when the selection changes. Args: (selected, deselected) rows.
    pub selection_changed: Signal<(Vec<usize>, Vec<usize>)>,
}

impl SelectionModel {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeSet::new()),
            selection_changed: Signal::new(),
        }
    }

    /// Whether `row` is selected.
    pub fn is_row_selected(&self, row: usize) -> bool {
        self.rows.lock().contains(&row)
    }

    /// Whether any row is selected.
    pub fn has_selection(&self) -> bool {
        !self.rows.lock().is_empty()
    }

    /// The selected rows in ascending order.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.rows.lock().iter().copied().collect()
    }

    /// Select or deselect `row`. Redundant changes emit nothing.
    pub fn set_row_selected(&self, row: usize, selected: bool) {
        let changed = {
            let mut rows = self.rows.lock();
            if selected {
                rows.insert(row)
            } else {
                rows.remove(&row)
            }
        };
        if changed {
            if selected {
                self.selection_changed.emit((vec![row], Vec::new()));
            } else {
                self.selection_changed.emit((Vec::new(), vec![row]));
            }
        }
    }

    /// Deselect every row.
    pub fn clear(&self) {
        let removed: Vec<usize> = {
            let mut rows = self.rows.lock();
            let removed = rows.iter().copied().collect();
            rows.clear();
            removed
        };
        if !removed.is_empty() {
            self.selection_changed.emit((Vec::new(), removed));
        }
    }
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn select_and_clear() {
        let selection = SelectionModel::new();
        assert!(!selection.has_selection());

        selection.set_row_selected(3, true);
        selection.set_row_selected(1, true);
        assert!(selection.is_row_selected(3));
        assert_eq!(selection.selected_rows(), vec![1, 3]);

        selection.set_row_selected(3, false);
        assert_eq!(selection.selected_rows(), vec![1]);

        selection.clear();
        assert!(!selection.has_selection());
    }

    #[test]
    fn redundant_changes_are_silent() {
        let selection = SelectionModel::new();
        let events = Arc::new(Mutex::new(0usize));
        let sink = events.clone();
        selection.selection_changed.connect(move |_| {
            *sink.lock() += 1;
        });

        selection.set_row_selected(0, true);
        selection.set_row_selected(0, true); // already selected
        selection.set_row_selected(9, false); // never selected
        selection.clear();
        selection.clear(); // already empty
        assert_eq!(*events.lock(), 2);
    }
}
