//! The delegate contract behind the item model bridge.

use crate::variant::Variant;

use super::index::ModelIndex;

/// Flags indicating what operations are allowed on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    /// Item can be selected.
    pub selectable: bool,
    /// Item can be edited.
    pub editable: bool,
    /// Item has a checkbox.
    pub checkable: bool,
    /// Item is enabled (can interact).
    pub enabled: bool,
}

impl ItemFlags {
    /// Flags with the defaults: selectable and enabled only.
    pub fn new() -> Self {
        Self {
            selectable: true,
            enabled: true,
            ..Default::default()
        }
    }

    /// Flags for a disabled item.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Sets the editable flag.
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Sets the checkable flag.
    pub fn with_checkable(mut self, checkable: bool) -> Self {
        self.checkable = checkable;
        self
    }
}

/// Roles for item data queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// Primary text to display.
    Display,
    /// Icon or decoration to show.
    Decoration,
    /// Value for editing.
    Edit,
    /// Tooltip text shown on hover.
    ToolTip,
    /// Custom font for the item.
    Font,
    /// Background brush for the item.
    Background,
    /// Foreground (text) color for the item.
    Foreground,
    /// Size hint for the item.
    SizeHint,
    /// Application-specific role.
    User(u32),
}

/// Header orientation for header data queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Horizontal header (column headers).
    Horizontal,
    /// Vertical header (row headers).
    Vertical,
}

/// The externally supplied object providing the data behind an
/// [`super::ItemModelBridge`].
///
/// The bridge holds no data of its own: every query is answered here. The
/// delegate reference must outlive the model it backs.
///
/// Item addressing follows the index contract: the delegate mints the
/// identity carried by each [`ModelIndex`] in [`index`](Self::index) and
/// resolves it back in the other queries. Return [`ModelIndex::invalid`]
/// for out-of-bounds positions and for the parent of root-level items.
pub trait ModelDelegate: Send + Sync {
    /// Number of rows under `parent` (root when invalid).
    fn row_count(&self, parent: &ModelIndex) -> usize;

    /// Number of columns under `parent`.
    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// Data for `index` under `role`. Unsupported roles yield
    /// [`Variant::Invalid`].
    fn data(&self, index: &ModelIndex, role: ItemRole) -> Variant;

    /// Header data for `section` in `orientation`.
    fn header_data(&self, _section: usize, _orientation: Orientation, _role: ItemRole) -> Variant {
        Variant::Invalid
    }

    /// Mint the index for `(row, column)` under `parent`.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// The parent of `index`.
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    /// Flags for `index`. Defaults to selectable and enabled.
    fn flags(&self, _index: &ModelIndex) -> ItemFlags {
        ItemFlags::new()
    }

    /// A view activated the item (return key or platform activation).
    fn item_activated(&self, _index: &ModelIndex) {}

    /// A view clicked the item.
    fn item_clicked(&self, _index: &ModelIndex) {}

    /// A view double-clicked the item.
    fn item_double_clicked(&self, _index: &ModelIndex) {}

    /// The pointer entered the item in a view.
    fn item_entered(&self, _index: &ModelIndex) {}

    /// A view pressed the item.
    fn item_pressed(&self, _index: &ModelIndex) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_builders() {
        let flags = ItemFlags::new();
        assert!(flags.selectable && flags.enabled);
        assert!(!flags.editable);

        let flags = ItemFlags::new().with_editable(true).with_checkable(true);
        assert!(flags.editable && flags.checkable);

        assert!(!ItemFlags::disabled().enabled);
    }
}
