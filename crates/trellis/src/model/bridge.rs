//! The delegate-backed item model bridge.
//!
//! [`ItemModelBridge`] adapts a [`ModelDelegate`] onto the toolkit's
//! model/view protocol. The bridge holds no item data, only the delegate
//! reference, a pending-change stack that enforces the begin/end pairing
//! contract, and the selection state of the views it is assigned to.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use trellis_core::{ObjectId, Signal};

use crate::error::{BridgeError, Result};
use crate::variant::Variant;

use super::index::ModelIndex;
use super::selection::SelectionModel;
use super::traits::{ItemFlags, ItemRole, ModelDelegate, Orientation};

/// Signals emitted around structural and content changes.
///
/// Views connect to these to stay synchronized with the delegate's backing
/// data. The `about_to` signal of each pair fires from the `begin_*` call,
/// the closing signal from the matching `end_*` call.
pub struct ModelSignals {
    /// Emitted just before rows are inserted. Args: (parent, first, last).
    pub rows_about_to_be_inserted: Signal<(ModelIndex, usize, usize)>,
    /// Emitted after rows have been inserted. Args: (parent, first, last).
    pub rows_inserted: Signal<(ModelIndex, usize, usize)>,
    /// Emitted just before rows are removed. Args: (parent, first, last).
    pub rows_about_to_be_removed: Signal<(ModelIndex, usize, usize)>,
    /// Emitted after rows have been removed. Args: (parent, first, last).
    pub rows_removed: Signal<(ModelIndex, usize, usize)>,
    /// Emitted just before columns are inserted. Args: (parent, first, last).
    pub columns_about_to_be_inserted: Signal<(ModelIndex, usize, usize)>,
    /// Emitted after columns have been inserted. Args: (parent, first, last).
    pub columns_inserted: Signal<(ModelIndex, usize, usize)>,
    /// Emitted just before columns are removed. Args: (parent, first, last).
    pub columns_about_to_be_removed: Signal<(ModelIndex, usize, usize)>,
    /// Emitted after columns have been removed. Args: (parent, first, last).
    pub columns_removed: Signal<(ModelIndex, usize, usize)>,
    /// Emitted for a content-only change. Args: (from_row, to_row), inclusive.
    pub data_changed: Signal<(usize, usize)>,
    /// Emitted before the model is reset.
    pub model_about_to_reset: Signal<()>,
    /// Emitted after the model has been reset.
    pub model_reset: Signal<()>,
}

impl ModelSignals {
    fn new() -> Self {
        Self {
            rows_about_to_be_inserted: Signal::new(),
            rows_inserted: Signal::new(),
            rows_about_to_be_removed: Signal::new(),
            rows_removed: Signal::new(),
            columns_about_to_be_inserted: Signal::new(),
            columns_inserted: Signal::new(),
            columns_about_to_be_removed: Signal::new(),
            columns_removed: Signal::new(),
            data_changed: Signal::new(),
            model_about_to_reset: Signal::new(),
            model_reset: Signal::new(),
        }
    }
}

/// One open structural change awaiting its matching `end_*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingChange {
    InsertRows(ModelIndex, usize, usize),
    RemoveRows(ModelIndex, usize, usize),
    InsertColumns(ModelIndex, usize, usize),
    RemoveColumns(ModelIndex, usize, usize),
}

impl PendingChange {
    fn kind(&self) -> &'static str {
        match self {
            Self::InsertRows(..) => "insert-rows",
            Self::RemoveRows(..) => "remove-rows",
            Self::InsertColumns(..) => "insert-columns",
            Self::RemoveColumns(..) => "remove-columns",
        }
    }
}

/// Adapts a [`ModelDelegate`] to the toolkit's tree-model protocol.
pub struct ItemModelBridge {
    delegate: RwLock<Option<Arc<dyn ModelDelegate>>>,
    /// Structural and content change notifications.
    pub signals: ModelSignals,
    pending: Mutex<Vec<PendingChange>>,
    views: Mutex<HashMap<ObjectId, Arc<SelectionModel>>>,
}

impl ItemModelBridge {
    /// Creates a bridge with no delegate attached.
    ///
    /// Every protocol call made before a delegate is attached is a fatal
    /// precondition violation.
    pub fn new() -> Self {
        Self {
            delegate: RwLock::new(None),
            signals: ModelSignals::new(),
            pending: Mutex::new(Vec::new()),
            views: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a bridge backed by `delegate`.
    pub fn with_delegate(delegate: Arc<dyn ModelDelegate>) -> Self {
        let bridge = Self::new();
        *bridge.delegate.write() = Some(delegate);
        bridge
    }

    /// Attach or replace the delegate.
    pub fn set_delegate(&self, delegate: Option<Arc<dyn ModelDelegate>>) {
        *self.delegate.write() = delegate;
    }

    /// The attached delegate, if any.
    pub fn delegate(&self) -> Option<Arc<dyn ModelDelegate>> {
        self.delegate.read().clone()
    }

    fn require_delegate(&self) -> Arc<dyn ModelDelegate> {
        self.delegate
            .read()
            .clone()
            .expect("item model bridge used with no delegate attached")
    }

    // -------------------------------------------------------------------------
    // Protocol queries, all delegated
    // -------------------------------------------------------------------------

    /// Number of rows under `parent`.
    pub fn row_count(&self, parent: &ModelIndex) -> usize {
        self.require_delegate().row_count(parent)
    }

    /// Number of columns under `parent`.
    pub fn column_count(&self, parent: &ModelIndex) -> usize {
        self.require_delegate().column_count(parent)
    }

    /// Data for `index` under `role`.
    pub fn data(&self, index: &ModelIndex, role: ItemRole) -> Variant {
        self.require_delegate().data(index, role)
    }

    /// Header data for `section` in `orientation`.
    pub fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> Variant {
        self.require_delegate().header_data(section, orientation, role)
    }

    /// The index at `(row, column)` under `parent`.
    pub fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        self.require_delegate().index(row, column, parent)
    }

    /// The parent of `index`.
    pub fn parent(&self, index: &ModelIndex) -> ModelIndex {
        self.require_delegate().parent(index)
    }

    /// Flags for `index`.
    pub fn flags(&self, index: &ModelIndex) -> ItemFlags {
        self.require_delegate().flags(index)
    }

    // -------------------------------------------------------------------------
    // Structural change notifications
    // -------------------------------------------------------------------------

    /// Open a row insertion of `[first, last]` under `parent`.
    ///
    /// Must be called before the delegate's backing data changes, and closed
    /// with [`end_insert_rows`](Self::end_insert_rows) after.
    pub fn begin_insert_rows(&self, parent: ModelIndex, first: usize, last: usize) {
        assert!(first <= last, "begin_insert_rows: first > last");
        self.pending
            .lock()
            .push(PendingChange::InsertRows(parent, first, last));
        self.signals
            .rows_about_to_be_inserted
            .emit((parent, first, last));
    }

    /// Close the innermost open row insertion.
    pub fn end_insert_rows(&self) {
        let PendingChange::InsertRows(parent, first, last) = self.close_pending("insert-rows")
        else {
            unreachable!()
        };
        tracing::trace!(target: "trellis::model", first, last, "rows inserted");
        self.signals.rows_inserted.emit((parent, first, last));
    }

    /// Open a row removal of `[first, last]` under `parent`.
    pub fn begin_remove_rows(&self, parent: ModelIndex, first: usize, last: usize) {
        assert!(first <= last, "begin_remove_rows: first > last");
        self.pending
            .lock()
            .push(PendingChange::RemoveRows(parent, first, last));
        self.signals
            .rows_about_to_be_removed
            .emit((parent, first, last));
    }

    /// Close the innermost open row removal.
    pub fn end_remove_rows(&self) {
        let PendingChange::RemoveRows(parent, first, last) = self.close_pending("remove-rows")
        else {
            unreachable!()
        };
        tracing::trace!(target: "trellis::model", first, last, "rows removed");
        self.signals.rows_removed.emit((parent, first, last));
    }

    /// Open a column insertion of `[first, last]` under `parent`.
    pub fn begin_insert_columns(&self, parent: ModelIndex, first: usize, last: usize) {
        assert!(first <= last, "begin_insert_columns: first > last");
        self.pending
            .lock()
            .push(PendingChange::InsertColumns(parent, first, last));
        self.signals
            .columns_about_to_be_inserted
            .emit((parent, first, last));
    }

    /// Close the innermost open column insertion.
    pub fn end_insert_columns(&self) {
        let PendingChange::InsertColumns(parent, first, last) =
            self.close_pending("insert-columns")
        else {
            unreachable!()
        };
        self.signals.columns_inserted.emit((parent, first, last));
    }

    /// Open a column removal of `[first, last]` under `parent`.
    pub fn begin_remove_columns(&self, parent: ModelIndex, first: usize, last: usize) {
        assert!(first <= last, "begin_remove_columns: first > last");
        self.pending
            .lock()
            .push(PendingChange::RemoveColumns(parent, first, last));
        self.signals
            .columns_about_to_be_removed
            .emit((parent, first, last));
    }

    /// Close the innermost open column removal.
    pub fn end_remove_columns(&self) {
        let PendingChange::RemoveColumns(parent, first, last) =
            self.close_pending("remove-columns")
        else {
            unreachable!()
        };
        self.signals.columns_removed.emit((parent, first, last));
    }

    fn close_pending(&self, expected: &'static str) -> PendingChange {
        let change = self
            .pending
            .lock()
            .pop()
            .unwrap_or_else(|| panic!("end_{expected} called with no open {expected} change"));
        assert_eq!(
            change.kind(),
            expected,
            "mismatched begin/end pair: open change is {}, end_{} was called",
            change.kind(),
            expected
        );
        change
    }

    /// Signal a full model reset. All outstanding indices become invalid.
    ///
    /// Must not be called while a begin/end pair is open.
    pub fn reset(&self) {
        assert!(
            self.pending.lock().is_empty(),
            "reset called inside an open begin/end pair"
        );
        self.require_delegate();
        self.signals.model_about_to_reset.emit(());
        self.signals.model_reset.emit(());
    }

    /// Signal a content-only change over rows `[from_row, to_row]`.
    pub fn notify_data_changed(&self, from_row: usize, to_row: usize) {
        assert!(from_row <= to_row, "notify_data_changed: from > to");
        self.require_delegate();
        self.signals.data_changed.emit((from_row, to_row));
    }

    // -------------------------------------------------------------------------
    // View selection
    // -------------------------------------------------------------------------

    /// Bind `view`'s selection state to this model.
    ///
    /// Called by the facade when the model is assigned to a view.
    pub fn attach_view(&self, view: ObjectId, selection: Arc<SelectionModel>) {
        self.views.lock().insert(view, selection);
    }

    /// Drop `view`'s selection binding. No-op if the view was never attached.
    pub fn detach_view(&self, view: ObjectId) {
        self.views.lock().remove(&view);
    }

    fn view_selection(
        &self,
        call: &'static str,
        view: ObjectId,
    ) -> Result<Arc<SelectionModel>> {
        self.views.lock().get(&view).cloned().ok_or_else(|| {
            BridgeError::illegal(
                call,
                "view",
                "a view this model is assigned to",
                format!("{view:?}"),
            )
        })
    }

    /// Select or deselect logical row `row` in `view`.
    pub fn set_item_selection(&self, view: ObjectId, row: usize, selected: bool) -> Result<()> {
        self.require_delegate();
        let selection = self.view_selection("set item selection", view)?;
        selection.set_row_selected(row, selected);
        Ok(())
    }

    /// Clear the selection in `view`.
    pub fn clear_selection(&self, view: ObjectId) -> Result<()> {
        self.require_delegate();
        let selection = self.view_selection("clear selection", view)?;
        selection.clear();
        Ok(())
    }

    /// Forward a view's item notification signal to the delegate.
    ///
    /// `signal` is the view signal name (`activated`, `clicked`,
    /// `doubleClicked`, `entered`, `pressed`); other names are ignored.
    /// The notified index is minted for `(row, 0)` at the root.
    pub fn forward_view_notification(&self, signal: &str, row: usize) {
        let delegate = self.require_delegate();
        let index = delegate.index(row, 0, &ModelIndex::invalid());
        match signal {
            "activated" => delegate.item_activated(&index),
            "clicked" => delegate.item_clicked(&index),
            "doubleClicked" => delegate.item_double_clicked(&index),
            "entered" => delegate.item_entered(&index),
            "pressed" => delegate.item_pressed(&index),
            _ => {}
        }
    }
}

impl Default for ItemModelBridge {
    fn default() -> Self {
        Self::new()
    }
}
