//! Object model for the embedded toolkit.
//!
//! Provides the arena-backed object system the bridge operates on:
//! - Unique object identifiers via slotmap storage
//! - A closed [`ObjectClass`] capability set replacing dynamic-cast probing
//! - Parent-child ownership relationships with drop cascade
//! - Structural slots (container items, actions, layout, dock content)
//! - Dynamic property storage
//!
//! # Key Types
//!
//! - [`ObjectId`] - Unique stable identifier for each object
//! - [`ObjectClass`] - The closed set of object kinds the bridge dispatches on
//! - [`ObjectRegistry`] - Arena managing all objects
//! - [`SharedObjectRegistry`] - Thread-safe wrapper around [`ObjectRegistry`]
//!
//! # Related Modules
//!
//! - [`crate::Signal`] - Notification primitive used by the bridge layers
//! - [`crate::TickNotifier`] - Periodic callback delivery

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for an object in the registry.
    ///
    /// `ObjectId`s are stable handles that remain valid as the object tree
    /// changes, and become invalid when the object is destroyed.
    pub struct ObjectId;
}

impl ObjectId {
    /// Convert the ObjectId to a raw u64 value.
    ///
    /// Used at the component boundary, where object identity travels as an
    /// integer. The raw value can be converted back with [`ObjectId::from_raw`].
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create an ObjectId from a raw u64 value.
    ///
    /// Does not check that the object still exists in the registry.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Errors that can occur during object operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// The object ID is invalid or has been destroyed.
    InvalidObjectId,
    /// Attempted to set an object as its own parent/ancestor.
    CircularParentage,
    /// The dynamic property was not found.
    PropertyNotFound,
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidObjectId => write!(f, "Invalid or destroyed object ID"),
            Self::CircularParentage => {
                write!(f, "Cannot set an object as its own parent or ancestor")
            }
            Self::PropertyNotFound => write!(f, "Dynamic property not found"),
        }
    }
}

impl std::error::Error for ObjectError {}

/// Result type for object operations.
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;

/// The closed set of object kinds the bridge knows how to manipulate.
///
/// Structural operations dispatch on this tag instead of probing an open
/// inheritance hierarchy; anything outside the accepted set of a given
/// operation is rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    /// The application object. Exactly one exists, owned by the facade.
    Application,
    /// A plain widget with no special container capability.
    Widget,
    /// A top-level window that hosts dock widgets.
    MainWindow,
    /// A dockable panel with a single content widget.
    DockWidget,
    /// A container with resizable panes.
    Splitter,
    /// A status bar with a permanent-widget section.
    StatusBar,
    /// A linear (horizontal or vertical) layout.
    BoxLayout,
    /// A layout showing one of its items at a time.
    StackedLayout,
    /// A non-visual command object for menus and toolbars.
    Action,
    /// An exclusive grouping of actions.
    ActionGroup,
    /// A popup menu of actions.
    Menu,
    /// A modal message dialog.
    MessageBox,
    /// A view driven by an item model.
    ItemView,
    /// A pane whose content is painted through a GL painter bridge.
    GlPane,
}

impl ObjectClass {
    /// Parse a class name as received from the component boundary.
    ///
    /// Matching is case-insensitive. `Application` is deliberately absent:
    /// the facade owns the one application object and it cannot be created
    /// through the factory.
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Some(match lower.as_str() {
            "widget" => Self::Widget,
            "mainwindow" => Self::MainWindow,
            "dockwidget" => Self::DockWidget,
            "splitter" => Self::Splitter,
            "statusbar" => Self::StatusBar,
            "boxlayout" => Self::BoxLayout,
            "stackedlayout" => Self::StackedLayout,
            "action" => Self::Action,
            "actiongroup" => Self::ActionGroup,
            "menu" => Self::Menu,
            "messagebox" => Self::MessageBox,
            "itemview" => Self::ItemView,
            "glpane" => Self::GlPane,
            _ => return None,
        })
    }

    /// The canonical class name, as reported in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::Widget => "Widget",
            Self::MainWindow => "MainWindow",
            Self::DockWidget => "DockWidget",
            Self::Splitter => "Splitter",
            Self::StatusBar => "StatusBar",
            Self::BoxLayout => "BoxLayout",
            Self::StackedLayout => "StackedLayout",
            Self::Action => "Action",
            Self::ActionGroup => "ActionGroup",
            Self::Menu => "Menu",
            Self::MessageBox => "MessageBox",
            Self::ItemView => "ItemView",
            Self::GlPane => "GlPane",
        }
    }

    /// Whether objects of this class occupy screen space.
    ///
    /// Layouts, actions and the application object are real objects but not
    /// widgets; operations that demand a widget reject them.
    pub fn is_widget(self) -> bool {
        matches!(
            self,
            Self::Widget
                | Self::MainWindow
                | Self::DockWidget
                | Self::Splitter
                | Self::StatusBar
                | Self::Menu
                | Self::MessageBox
                | Self::ItemView
                | Self::GlPane
        )
    }

    /// Whether objects of this class arrange child widgets.
    pub fn is_layout(self) -> bool {
        matches!(self, Self::BoxLayout | Self::StackedLayout)
    }

    /// The signal names objects of this class can emit.
    ///
    /// The connection hub validates `connect` calls against this table, which
    /// turns the toolkit's "unknown signal" runtime warning into a checked
    /// illegal-argument failure at the boundary.
    pub fn signals(self) -> &'static [&'static str] {
        match self {
            Self::Application => &["aboutToQuit"],
            Self::Widget | Self::DockWidget | Self::MainWindow | Self::StatusBar => &["destroyed"],
            Self::Splitter => &["destroyed", "splitterMoved"],
            Self::BoxLayout => &[],
            Self::StackedLayout => &["currentChanged"],
            Self::Action => &["triggered", "toggled", "changed"],
            Self::ActionGroup => &["triggered"],
            Self::Menu => &["destroyed", "triggered", "aboutToShow", "aboutToHide"],
            Self::MessageBox => &["destroyed", "accepted", "rejected", "finished"],
            Self::ItemView => &[
                "destroyed",
                "activated",
                "clicked",
                "doubleClicked",
                "entered",
                "pressed",
            ],
            Self::GlPane => &["destroyed"],
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dock areas of a main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DockArea {
    /// Left dock area.
    #[default]
    Left,
    /// Right dock area.
    Right,
    /// Top dock area.
    Top,
    /// Bottom dock area.
    Bottom,
}

/// Geometry and visibility state carried by widget-class objects.
///
/// `origin` is the widget's top-left corner in global coordinates; the bridge
/// uses it for global/local coordinate mapping. Sizes are updated by resize
/// events flowing through the dispatcher.
#[derive(Clone, Copy, Debug)]
pub struct WidgetState {
    /// Global x of the widget's top-left corner.
    pub origin_x: i32,
    /// Global y of the widget's top-left corner.
    pub origin_y: i32,
    /// Current width in pixels.
    pub width: i32,
    /// Current height in pixels.
    pub height: i32,
    /// Whether the widget is shown.
    pub visible: bool,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            width: 0,
            height: 0,
            visible: false,
        }
    }
}

/// Internal data stored in the registry for each object.
pub struct ObjectData {
    /// Human-readable name for debugging and lookup.
    name: String,
    /// The class tag dispatch operates on.
    class: ObjectClass,
    /// Parent object (if any).
    parent: Option<ObjectId>,
    /// Child objects (owned; destroyed with this object).
    children: Vec<ObjectId>,
    /// Geometry/visibility for widget classes, `None` otherwise.
    pub widget: Option<WidgetState>,
    /// Ordered container items (splitter panes, layout items, permanent
    /// status-bar widgets, stacked-layout pages).
    pub items: Vec<ObjectId>,
    /// Actions attached to a widget, action group or menu.
    pub actions: Vec<ObjectId>,
    /// The layout installed on a widget.
    pub layout: Option<ObjectId>,
    /// The content widget of a dock widget.
    pub content: Option<ObjectId>,
    /// Docks attached to a main window, with their areas.
    pub docks: Vec<(DockArea, ObjectId)>,
    /// Whether an action renders as a separator.
    pub separator: bool,
    /// The submenu attached to an action.
    pub menu: Option<ObjectId>,
    /// Dynamic properties (type-erased).
    properties: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl ObjectData {
    fn new(class: ObjectClass) -> Self {
        Self {
            name: String::new(),
            class,
            parent: None,
            children: Vec::new(),
            widget: class.is_widget().then(WidgetState::default),
            items: Vec::new(),
            actions: Vec::new(),
            layout: None,
            content: None,
            docks: Vec::new(),
            separator: false,
            menu: None,
            properties: HashMap::new(),
        }
    }

    /// The object's class tag.
    #[inline]
    pub fn class(&self) -> ObjectClass {
        self.class
    }

    /// The object's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent object, if any.
    #[inline]
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// The object's children, in creation order.
    #[inline]
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Look up a typed dynamic property.
    pub fn property<T: 'static>(&self, key: &str) -> Option<&T> {
        self.properties.get(key)?.downcast_ref::<T>()
    }

    /// Set a dynamic property, replacing any previous value under `key`.
    pub fn set_property<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.properties.insert(key.into(), Box::new(value));
    }

    /// Remove a dynamic property. Returns whether it existed.
    pub fn remove_property(&mut self, key: &str) -> bool {
        self.properties.remove(key).is_some()
    }
}

/// Arena of all toolkit objects, owned by the facade.
///
/// The registry is the stand-in for the native toolkit's object hierarchy:
/// every handle that crosses the component boundary resolves here. It is only
/// ever mutated from the one logical GUI thread.
pub struct ObjectRegistry {
    objects: SlotMap<ObjectId, ObjectData>,
}

impl ObjectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
        }
    }

    /// Create an object of `class` and return its id.
    pub fn create(&mut self, class: ObjectClass) -> ObjectId {
        let id = self.objects.insert(ObjectData::new(class));
        tracing::trace!(target: "trellis_core::object", ?id, %class, "object created");
        id
    }

    /// Whether `id` refers to a live object.
    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of live objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the registry holds no objects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Borrow an object's data.
    #[inline]
    pub fn get(&self, id: ObjectId) -> ObjectResult<&ObjectData> {
        self.objects.get(id).ok_or(ObjectError::InvalidObjectId)
    }

    /// Mutably borrow an object's data.
    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> ObjectResult<&mut ObjectData> {
        self.objects.get_mut(id).ok_or(ObjectError::InvalidObjectId)
    }

    /// The class of an object, or `None` if it has been destroyed.
    #[inline]
    pub fn class_of(&self, id: ObjectId) -> Option<ObjectClass> {
        self.objects.get(id).map(|d| d.class)
    }

    /// Set an object's debug name.
    pub fn set_name(&mut self, id: ObjectId, name: impl Into<String>) -> ObjectResult<()> {
        self.get_mut(id)?.name = name.into();
        Ok(())
    }

    /// Re-parent `id` under `parent`, or detach it when `parent` is `None`.
    ///
    /// Rejects cycles: an object cannot become a child of itself or of any
    /// of its descendants.
    pub fn set_parent(&mut self, id: ObjectId, parent: Option<ObjectId>) -> ObjectResult<()> {
        if !self.contains(id) {
            return Err(ObjectError::InvalidObjectId);
        }
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(ObjectError::InvalidObjectId);
            }
            if p == id || self.is_ancestor(id, p) {
                return Err(ObjectError::CircularParentage);
            }
        }

        // Unlink from the old parent first.
        if let Some(old) = self.objects[id].parent
            && let Some(old_data) = self.objects.get_mut(old)
        {
            old_data.children.retain(|&c| c != id);
        }

        self.objects[id].parent = parent;
        if let Some(p) = parent {
            self.objects[p].children.push(id);
        }
        Ok(())
    }

    /// Whether `ancestor` appears on `id`'s parent chain.
    pub fn is_ancestor(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = self.objects.get(id).and_then(|d| d.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.objects.get(p).and_then(|d| d.parent);
        }
        false
    }

    /// Destroy an object and, recursively, all of its children.
    ///
    /// Destroying an already-destroyed object is a no-op.
    pub fn destroy(&mut self, id: ObjectId) {
        let Some(data) = self.objects.get(id) else {
            return;
        };
        let children = data.children.clone();
        for child in children {
            self.destroy(child);
        }
        if let Some(parent) = self.objects[id].parent
            && let Some(parent_data) = self.objects.get_mut(parent)
        {
            parent_data.children.retain(|&c| c != id);
        }
        self.objects.remove(id);
        tracing::trace!(target: "trellis_core::object", ?id, "object destroyed");
    }

    /// Iterate over all live objects.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &ObjectData)> {
        self.objects.iter()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A shared, lock-guarded handle to an [`ObjectRegistry`].
///
/// All operations run on the one logical GUI thread, but callback objects are
/// `Send + Sync` and the lock keeps the registry coherent if a host pumps it
/// from a different thread than the one that built it. Callers must never
/// invoke user callbacks while holding a guard.
#[derive(Clone)]
pub struct SharedObjectRegistry {
    inner: Arc<RwLock<ObjectRegistry>>,
}

impl SharedObjectRegistry {
    /// Create a shared handle around an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(ObjectRegistry::new())),
        }
    }

    /// Acquire a read guard.
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, ObjectRegistry> {
        self.inner.read()
    }

    /// Acquire a write guard.
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, ObjectRegistry> {
        self.inner.write()
    }
}

impl Default for SharedObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_lookup() {
        let mut reg = ObjectRegistry::new();
        let id = reg.create(ObjectClass::Widget);
        assert!(reg.contains(id));
        assert_eq!(reg.class_of(id), Some(ObjectClass::Widget));
        assert!(reg.get(id).unwrap().widget.is_some());

        let layout = reg.create(ObjectClass::BoxLayout);
        assert!(reg.get(layout).unwrap().widget.is_none());
    }

    #[test]
    fn raw_roundtrip() {
        let mut reg = ObjectRegistry::new();
        let id = reg.create(ObjectClass::Menu);
        assert_eq!(ObjectId::from_raw(id.as_raw()), id);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(ObjectClass::parse("splitter"), Some(ObjectClass::Splitter));
        assert_eq!(ObjectClass::parse("SPLITTER"), Some(ObjectClass::Splitter));
        assert_eq!(
            ObjectClass::parse("StackedLayout"),
            Some(ObjectClass::StackedLayout)
        );
        assert_eq!(ObjectClass::parse("QWidget"), None);
        // The application object is not creatable through the factory.
        assert_eq!(ObjectClass::parse("application"), None);
    }

    #[test]
    fn parenting_and_cascade() {
        let mut reg = ObjectRegistry::new();
        let window = reg.create(ObjectClass::MainWindow);
        let child = reg.create(ObjectClass::Widget);
        let grandchild = reg.create(ObjectClass::Widget);

        reg.set_parent(child, Some(window)).unwrap();
        reg.set_parent(grandchild, Some(child)).unwrap();
        assert_eq!(reg.get(child).unwrap().parent(), Some(window));
        assert_eq!(reg.get(window).unwrap().children(), &[child]);

        // Cycles are rejected.
        assert_eq!(
            reg.set_parent(window, Some(grandchild)),
            Err(ObjectError::CircularParentage)
        );

        reg.destroy(window);
        assert!(!reg.contains(window));
        assert!(!reg.contains(child));
        assert!(!reg.contains(grandchild));
    }

    #[test]
    fn reparent_unlinks_old_parent() {
        let mut reg = ObjectRegistry::new();
        let a = reg.create(ObjectClass::Widget);
        let b = reg.create(ObjectClass::Widget);
        let child = reg.create(ObjectClass::Widget);

        reg.set_parent(child, Some(a)).unwrap();
        reg.set_parent(child, Some(b)).unwrap();
        assert!(reg.get(a).unwrap().children().is_empty());
        assert_eq!(reg.get(b).unwrap().children(), &[child]);

        reg.set_parent(child, None).unwrap();
        assert!(reg.get(b).unwrap().children().is_empty());
        assert_eq!(reg.get(child).unwrap().parent(), None);
    }

    #[test]
    fn dynamic_properties() {
        let mut reg = ObjectRegistry::new();
        let id = reg.create(ObjectClass::Widget);
        reg.get_mut(id).unwrap().set_property("zoom", 1.5f64);
        assert_eq!(reg.get(id).unwrap().property::<f64>("zoom"), Some(&1.5));
        // Wrong type reads as absent.
        assert_eq!(reg.get(id).unwrap().property::<i32>("zoom"), None);
        assert!(reg.get_mut(id).unwrap().remove_property("zoom"));
        assert!(!reg.get_mut(id).unwrap().remove_property("zoom"));
    }

    #[test]
    fn signal_tables() {
        assert!(ObjectClass::Action.signals().contains(&"triggered"));
        assert!(ObjectClass::ItemView.signals().contains(&"doubleClicked"));
        assert!(!ObjectClass::Widget.signals().contains(&"triggered"));
    }
}
