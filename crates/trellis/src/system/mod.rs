//! The system facade.
//!
//! [`System`] is the process-wide composition root of the bridge. It owns
//! the toolkit object registry, one event hub, one connection hub, one tick
//! notifier and the platform handle, and exposes the factory, hierarchy,
//! action/menu, cursor, model/view, event, timer and connection operations
//! the component boundary calls into.
//!
//! Every operation validates the class of the handles it receives before
//! touching any state: a mismatch yields [`BridgeError::IllegalArgument`]
//! and leaves the registry exactly as it was.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use trellis_core::{
    DockArea, ObjectClass, ObjectId, SharedObjectRegistry, TickCallback, TickNotifier,
};

use crate::connect::{ConnectionHandler, ConnectionHub};
use crate::cursor::CursorShape;
use crate::error::{BridgeError, Result};
use crate::event::{EventHandler, EventHub, WidgetEvent};
use crate::glpane::GlPaneBridge;
use crate::model::{ItemModelBridge, SelectionModel};
use crate::platform::{HeadlessPlatform, Platform};
use crate::variant::Variant;

/// The model and selection state bound to one item view.
struct ViewBinding {
    model: Arc<ItemModelBridge>,
    selection: Arc<SelectionModel>,
}

/// The application-wide bridge facade.
///
/// One `System` exists per process, constructed before anything else touches
/// the toolkit side; since all toolkit objects live in the registry the
/// facade owns, that ordering holds by construction. Subsystems are dropped
/// in reverse construction order: field order below puts the hubs before
/// the registry, so the application object outlives everything that can
/// reference it.
pub struct System {
    platform: Arc<dyn Platform>,
    event_hub: EventHub,
    connection_hub: ConnectionHub,
    tick: TickNotifier,
    views: Mutex<HashMap<ObjectId, ViewBinding>>,
    gl_panes: Mutex<HashMap<ObjectId, Arc<GlPaneBridge>>>,
    search_paths: RwLock<HashMap<String, Vec<PathBuf>>>,
    mouse_grabber: Mutex<Option<ObjectId>>,
    quit: AtomicBool,
    app: ObjectId,
    registry: SharedObjectRegistry,
}

impl System {
    /// Create a facade with the headless platform.
    pub fn new() -> Self {
        Self::with_platform(HeadlessPlatform::new())
    }

    /// Create a facade delegating host operations to `platform`.
    pub fn with_platform(platform: Arc<dyn Platform>) -> Self {
        // The application object exists before any other toolkit object.
        let registry = SharedObjectRegistry::new();
        let app = {
            let mut reg = registry.write();
            let app = reg.create(ObjectClass::Application);
            let _ = reg.set_name(app, "application");
            app
        };
        tracing::debug!(target: "trellis::system", ?app, "system facade constructed");
        Self {
            platform,
            event_hub: EventHub::new(),
            connection_hub: ConnectionHub::new(),
            tick: TickNotifier::new(),
            views: Mutex::new(HashMap::new()),
            gl_panes: Mutex::new(HashMap::new()),
            search_paths: RwLock::new(HashMap::new()),
            mouse_grabber: Mutex::new(None),
            quit: AtomicBool::new(false),
            app,
            registry,
        }
    }

    /// The application object handle.
    pub fn app(&self) -> ObjectId {
        self.app
    }

    /// The toolkit object registry.
    pub fn registry(&self) -> &SharedObjectRegistry {
        &self.registry
    }

    /// The shared tick notifier behind the timer-callback API.
    pub fn tick_notifier(&self) -> &TickNotifier {
        &self.tick
    }

    // -------------------------------------------------------------------------
    // Validation helpers
    // -------------------------------------------------------------------------

    fn expect_class(
        &self,
        call: &'static str,
        arg: &'static str,
        expected: &'static str,
        id: ObjectId,
        accept: impl Fn(ObjectClass) -> bool,
    ) -> Result<ObjectClass> {
        match self.registry.read().class_of(id) {
            None => Err(BridgeError::illegal(call, arg, expected, "a destroyed object")),
            Some(class) if !accept(class) => {
                Err(BridgeError::illegal(call, arg, expected, class.name()))
            }
            Some(class) => Ok(class),
        }
    }

    fn expect_widget(&self, call: &'static str, arg: &'static str, id: ObjectId) -> Result<()> {
        self.expect_class(call, arg, "a widget", id, ObjectClass::is_widget)?;
        Ok(())
    }

    fn expect_signal(&self, call: &'static str, sender: ObjectId, signal: &str) -> Result<ObjectClass> {
        let class = self.expect_class(call, "sender", "a live object", sender, |_| true)?;
        if class.signals().contains(&signal) {
            Ok(class)
        } else {
            Err(BridgeError::illegal(
                call,
                "signal",
                "a signal declared by the sender's class",
                signal,
            ))
        }
    }

    // -------------------------------------------------------------------------
    // Factory and resources
    // -------------------------------------------------------------------------

    /// Create a toolkit object of class `class_name`, optionally parented.
    ///
    /// Class lookup is case-insensitive over the closed class set; an
    /// unknown class yields [`BridgeError::NotSupported`].
    pub fn new_instance_of(
        &self,
        class_name: &str,
        parent: Option<ObjectId>,
    ) -> Result<ObjectId> {
        let Some(class) = ObjectClass::parse(class_name) else {
            return Err(BridgeError::NotSupported {
                class: class_name.to_owned(),
            });
        };
        if let Some(parent) = parent {
            self.expect_class("create instance", "parent", "a live object", parent, |_| true)?;
        }

        let mut reg = self.registry.write();
        let id = reg.create(class);
        if let Some(parent) = parent {
            reg.set_parent(id, Some(parent))?;
        }
        tracing::debug!(target: "trellis::system", %class, ?id, "instance created");
        Ok(id)
    }

    /// Create a GL pane object and its painter bridge.
    pub fn new_gl_pane(&self, parent: Option<ObjectId>) -> Result<Arc<GlPaneBridge>> {
        if let Some(parent) = parent {
            self.expect_widget("create GL pane", "parent", parent)?;
        }
        let mut reg = self.registry.write();
        let id = reg.create(ObjectClass::GlPane);
        if let Some(parent) = parent {
            reg.set_parent(id, Some(parent))?;
        }
        drop(reg);

        let bridge = Arc::new(GlPaneBridge::new(id));
        self.gl_panes.lock().insert(id, bridge.clone());
        Ok(bridge)
    }

    /// Register search roots for paths of the form `prefix:rest`.
    pub fn set_search_paths(&self, prefix: impl Into<String>, paths: Vec<PathBuf>) {
        self.search_paths.write().insert(prefix.into(), paths);
    }

    /// Resolve a possibly prefixed path against the registered search roots.
    ///
    /// `prefix:rest` tries each root registered for `prefix` in order and
    /// returns the first existing candidate (the last candidate when none
    /// exists). Unprefixed paths pass through unchanged.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        let Some(text) = path.to_str() else {
            return path.to_owned();
        };
        let Some((prefix, rest)) = text.split_once(':') else {
            return path.to_owned();
        };
        let roots = self.search_paths.read();
        let Some(roots) = roots.get(prefix) else {
            return path.to_owned();
        };
        let mut candidate = path.to_owned();
        for root in roots {
            candidate = root.join(rest);
            if candidate.exists() {
                break;
            }
        }
        candidate
    }

    /// Build a widget tree from the UI description at `path`.
    ///
    /// The file must exist after search-path resolution; loading itself is
    /// delegated to the platform. The loaded root is re-parented under
    /// `parent` when one is given.
    pub fn load_ui(&self, path: impl AsRef<Path>, parent: Option<ObjectId>) -> Result<ObjectId> {
        if let Some(parent) = parent {
            self.expect_class(
                "set parent widget",
                "parent",
                "a widget",
                parent,
                ObjectClass::is_widget,
            )?;
        }

        let resolved = self.resolve_path(path.as_ref());
        if !resolved.exists() {
            return Err(BridgeError::Resource { path: resolved });
        }

        let widget = self.platform.load_ui(&self.registry, &resolved, parent)?;
        self.registry.write().set_parent(widget, parent)?;
        Ok(widget)
    }

    /// Ask the user for an existing directory. `None` means dismissed.
    pub fn existing_directory(
        &self,
        parent: Option<ObjectId>,
        caption: &str,
        initial_dir: impl AsRef<Path>,
    ) -> Result<Option<PathBuf>> {
        if let Some(parent) = parent {
            self.expect_widget("open directory dialog", "parent", parent)?;
        }
        Ok(self
            .platform
            .existing_directory(parent, caption, initial_dir.as_ref()))
    }

    /// Ask the user for zero or more files to open.
    pub fn open_file_names(
        &self,
        parent: Option<ObjectId>,
        caption: &str,
        initial_dir: impl AsRef<Path>,
        filter: &str,
    ) -> Result<Vec<PathBuf>> {
        if let Some(parent) = parent {
            self.expect_widget("open file dialog", "parent", parent)?;
        }
        Ok(self
            .platform
            .open_file_names(parent, caption, initial_dir.as_ref(), filter))
    }

    // -------------------------------------------------------------------------
    // Widget hierarchy
    // -------------------------------------------------------------------------

    /// Append `widget` to a layout or splitter.
    pub fn add_widget(&self, parent: ObjectId, widget: ObjectId) -> Result<()> {
        self.expect_widget("add widget", "widget", widget)?;
        self.expect_class(
            "add widget",
            "parent",
            "a layout or splitter",
            parent,
            |c| c.is_layout() || c == ObjectClass::Splitter,
        )?;

        let mut reg = self.registry.write();
        reg.set_parent(widget, Some(parent))?;
        reg.get_mut(parent)?.items.push(widget);
        Ok(())
    }

    /// Insert `widget` into a container before `before_index`.
    ///
    /// Accepted containers: splitter, box layout, status bar (permanent
    /// section), stacked layout. A negative `before_index` appends; an index
    /// past the end appends as well.
    pub fn insert_widget(
        &self,
        parent: ObjectId,
        before_index: i32,
        widget: ObjectId,
    ) -> Result<()> {
        self.expect_widget("insert widget", "widget", widget)?;
        self.expect_class(
            "insert widget",
            "parent",
            "a splitter, box layout, status bar or stacked layout",
            parent,
            |c| {
                matches!(
                    c,
                    ObjectClass::Splitter
                        | ObjectClass::BoxLayout
                        | ObjectClass::StatusBar
                        | ObjectClass::StackedLayout
                )
            },
        )?;

        let mut reg = self.registry.write();
        reg.set_parent(widget, Some(parent))?;
        let items = &mut reg.get_mut(parent)?.items;
        let index = if before_index >= 0 {
            (before_index as usize).min(items.len())
        } else {
            items.len()
        };
        items.insert(index, widget);
        Ok(())
    }

    /// Remove `widget` from a box layout, status bar or stacked layout and
    /// detach its parent link.
    pub fn remove_widget(&self, parent: ObjectId, widget: ObjectId) -> Result<()> {
        self.expect_widget("remove widget", "widget", widget)?;
        self.expect_class(
            "remove widget",
            "parent",
            "a box layout, status bar or stacked layout",
            parent,
            |c| {
                matches!(
                    c,
                    ObjectClass::BoxLayout | ObjectClass::StatusBar | ObjectClass::StackedLayout
                )
            },
        )?;

        let mut reg = self.registry.write();
        reg.get_mut(parent)?.items.retain(|&w| w != widget);
        reg.set_parent(widget, None)?;
        Ok(())
    }

    /// Attach `dock` to `main_window` in `area`.
    pub fn add_dock_widget(
        &self,
        main_window: ObjectId,
        area: DockArea,
        dock: ObjectId,
    ) -> Result<()> {
        self.expect_class(
            "add dock widget",
            "mainWindow",
            "a main window",
            main_window,
            |c| c == ObjectClass::MainWindow,
        )?;
        self.expect_class("add dock widget", "dockWidget", "a dock widget", dock, |c| {
            c == ObjectClass::DockWidget
        })?;

        let mut reg = self.registry.write();
        reg.set_parent(dock, Some(main_window))?;
        reg.get_mut(main_window)?.docks.push((area, dock));
        Ok(())
    }

    /// Set the content widget of a dock widget.
    pub fn set_widget(&self, dock: ObjectId, widget: ObjectId) -> Result<()> {
        self.expect_class("set widget", "dockWidget", "a dock widget", dock, |c| {
            c == ObjectClass::DockWidget
        })?;
        self.expect_widget("set widget", "widget", widget)?;

        let mut reg = self.registry.write();
        reg.set_parent(widget, Some(dock))?;
        reg.get_mut(dock)?.content = Some(widget);
        Ok(())
    }

    /// Install `layout` on `widget`.
    pub fn set_layout(&self, widget: ObjectId, layout: ObjectId) -> Result<()> {
        self.expect_widget("set layout", "widget", widget)?;
        self.expect_class("set layout", "layout", "a layout", layout, ObjectClass::is_layout)?;

        let mut reg = self.registry.write();
        reg.set_parent(layout, Some(widget))?;
        reg.get_mut(widget)?.layout = Some(layout);
        Ok(())
    }

    /// The layout installed on `widget`, if any.
    pub fn get_layout(&self, widget: ObjectId) -> Result<Option<ObjectId>> {
        self.expect_widget("get layout", "widget", widget)?;
        Ok(self.registry.read().get(widget)?.layout)
    }

    // -------------------------------------------------------------------------
    // Actions and menus
    // -------------------------------------------------------------------------

    /// Add `action` to an action group.
    pub fn add_action_into_group(&self, group: ObjectId, action: ObjectId) -> Result<()> {
        self.expect_class(
            "insert action into group",
            "actionGroup",
            "an action group",
            group,
            |c| c == ObjectClass::ActionGroup,
        )?;
        self.expect_class("insert action into group", "action", "an action", action, |c| {
            c == ObjectClass::Action
        })?;

        let mut reg = self.registry.write();
        let actions = &mut reg.get_mut(group)?.actions;
        if !actions.contains(&action) {
            actions.push(action);
        }
        Ok(())
    }

    /// Insert `action` into `widget`'s action list before `before_index`.
    ///
    /// A negative index appends. A non-negative index must address an
    /// existing action, matching the toolkit's out-of-bounds contract.
    pub fn insert_action(
        &self,
        widget: ObjectId,
        before_index: i32,
        action: ObjectId,
    ) -> Result<()> {
        self.expect_widget("insert action", "widget", widget)?;
        self.expect_class("insert action", "action", "an action", action, |c| {
            c == ObjectClass::Action
        })?;

        let mut reg = self.registry.write();
        let len = reg.get(widget)?.actions.len();
        let index = if before_index >= 0 {
            let index = before_index as usize;
            if index >= len {
                return Err(BridgeError::OutOfBounds {
                    call: "insert action",
                    arg: "beforeActionIndex",
                });
            }
            index
        } else {
            len
        };
        reg.get_mut(widget)?.actions.insert(index, action);
        Ok(())
    }

    /// Remove `action` from `widget`'s action list. No-op if absent.
    pub fn remove_action(&self, widget: ObjectId, action: ObjectId) -> Result<()> {
        self.expect_widget("remove action", "widget", widget)?;
        self.expect_class("remove action", "action", "an action", action, |c| {
            c == ObjectClass::Action
        })?;

        self.registry
            .write()
            .get_mut(widget)?
            .actions
            .retain(|&a| a != action);
        Ok(())
    }

    /// Turn `action` into a separator.
    pub fn make_separator(&self, action: ObjectId) -> Result<()> {
        self.expect_class("make separator", "action", "an action", action, |c| {
            c == ObjectClass::Action
        })?;
        self.registry.write().get_mut(action)?.separator = true;
        Ok(())
    }

    /// Attach `menu` as `action`'s submenu.
    pub fn set_menu(&self, action: ObjectId, menu: ObjectId) -> Result<()> {
        self.expect_class("set menu", "action", "an action", action, |c| {
            c == ObjectClass::Action
        })?;
        self.expect_class("set menu", "menu", "a menu", menu, |c| c == ObjectClass::Menu)?;
        self.registry.write().get_mut(action)?.menu = Some(menu);
        Ok(())
    }

    /// Run `menu` at `(x, y)` until the user selects an action or dismisses.
    ///
    /// Negative coordinates run the menu at the current global cursor
    /// position. The call suspends in the platform until a terminal user
    /// action and resumes with the selected action, `None` when dismissed.
    /// A selection fires the action's `triggered` signal.
    pub fn exec_menu(&self, menu: ObjectId, x: i32, y: i32) -> Result<Option<ObjectId>> {
        self.expect_class("exec menu", "menu", "a menu", menu, |c| c == ObjectClass::Menu)?;

        let pos = if x < 0 || y < 0 {
            self.platform.cursor_position()
        } else {
            (x, y)
        };
        let actions = self.registry.read().get(menu)?.actions.clone();

        self.connection_hub.emit(menu, "aboutToShow", &[]);
        let selected = self
            .platform
            .exec_menu(menu, &actions, pos)
            .filter(|a| actions.contains(a));
        self.connection_hub.emit(menu, "aboutToHide", &[]);

        if let Some(action) = selected {
            self.connection_hub
                .emit(action, "triggered", &[Variant::from(false)]);
        }
        Ok(selected)
    }

    // -------------------------------------------------------------------------
    // Cursor and mouse
    // -------------------------------------------------------------------------

    /// Request cursor `shape` while the pointer is over `widget`.
    pub fn set_cursor(&self, widget: ObjectId, shape: CursorShape) -> Result<()> {
        self.expect_widget("set cursor", "widget", widget)?;
        self.registry
            .write()
            .get_mut(widget)?
            .set_property("cursor", shape);
        Ok(())
    }

    /// Drop `widget`'s cursor request. No-op if none was set.
    pub fn unset_cursor(&self, widget: ObjectId) -> Result<()> {
        self.expect_widget("unset cursor", "widget", widget)?;
        self.registry.write().get_mut(widget)?.remove_property("cursor");
        Ok(())
    }

    /// The cursor shape requested for `widget`, if any.
    pub fn cursor_shape(&self, widget: ObjectId) -> Result<Option<CursorShape>> {
        self.expect_widget("get cursor", "widget", widget)?;
        Ok(self
            .registry
            .read()
            .get(widget)?
            .property::<CursorShape>("cursor")
            .copied())
    }

    /// Move the global pointer.
    pub fn set_cursor_position(&self, widget: ObjectId, x: i32, y: i32) -> Result<()> {
        self.expect_widget("set cursor position", "widget", widget)?;
        self.platform.set_cursor_position(x, y);
        Ok(())
    }

    /// The global pointer position.
    pub fn get_cursor_position(&self, widget: ObjectId) -> Result<(i32, i32)> {
        self.expect_widget("get cursor position", "widget", widget)?;
        Ok(self.platform.cursor_position())
    }

    /// Record `widget`'s global geometry, as fed by the host.
    pub fn set_widget_geometry(
        &self,
        widget: ObjectId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<()> {
        self.expect_widget("set widget geometry", "widget", widget)?;
        let mut reg = self.registry.write();
        let state = reg.get_mut(widget)?.widget.as_mut().expect("widget class has state");
        state.origin_x = x;
        state.origin_y = y;
        state.width = width;
        state.height = height;
        Ok(())
    }

    /// Map a global position into `widget` coordinates.
    pub fn map_from_global(&self, widget: ObjectId, x: i32, y: i32) -> Result<(i32, i32)> {
        self.expect_widget("map from global", "widget", widget)?;
        let reg = self.registry.read();
        let state = reg.get(widget)?.widget.expect("widget class has state");
        Ok((x - state.origin_x, y - state.origin_y))
    }

    /// Map a position in `widget` coordinates to global coordinates.
    pub fn map_to_global(&self, widget: ObjectId, x: i32, y: i32) -> Result<(i32, i32)> {
        self.expect_widget("map to global", "widget", widget)?;
        let reg = self.registry.read();
        let state = reg.get(widget)?.widget.expect("widget class has state");
        Ok((x + state.origin_x, y + state.origin_y))
    }

    /// Route all pointer input to `widget`, replacing any previous grabber.
    pub fn grab_mouse(&self, widget: ObjectId) -> Result<()> {
        self.expect_widget("grab mouse", "widget", widget)?;
        *self.mouse_grabber.lock() = Some(widget);
        Ok(())
    }

    /// Release the pointer grab. No-op if `widget` is not the grabber.
    pub fn release_mouse(&self, widget: ObjectId) -> Result<()> {
        self.expect_widget("release mouse", "widget", widget)?;
        let mut grabber = self.mouse_grabber.lock();
        if *grabber == Some(widget) {
            *grabber = None;
        }
        Ok(())
    }

    /// The current pointer grabber, if any.
    pub fn mouse_grabber(&self) -> Option<ObjectId> {
        *self.mouse_grabber.lock()
    }

    // -------------------------------------------------------------------------
    // Models and views
    // -------------------------------------------------------------------------

    /// Drive `view` from `model`, replacing any previous assignment.
    ///
    /// Binds a fresh selection model for the view and routes the view's item
    /// signals (`activated`, `clicked`, …) to the model's delegate.
    pub fn assign_model_to_view(
        &self,
        view: ObjectId,
        model: &Arc<ItemModelBridge>,
    ) -> Result<()> {
        self.expect_class("assign model to view", "view", "an item view", view, |c| {
            c == ObjectClass::ItemView
        })?;

        // Detach any previous binding first so reassigning the same model
        // does not drop the attachment made below.
        if let Some(previous) = self.views.lock().remove(&view) {
            previous.model.detach_view(view);
        }

        let selection = Arc::new(SelectionModel::new());
        model.attach_view(view, selection.clone());
        self.views.lock().insert(
            view,
            ViewBinding {
                model: model.clone(),
                selection,
            },
        );
        tracing::debug!(target: "trellis::system", ?view, "model assigned to view");
        Ok(())
    }

    /// The model driving `view`, if one is assigned.
    pub fn get_model_from_view(&self, view: ObjectId) -> Result<Option<Arc<ItemModelBridge>>> {
        self.expect_class(
            "retrieve model from view",
            "view",
            "an item view",
            view,
            |c| c == ObjectClass::ItemView,
        )?;
        Ok(self.views.lock().get(&view).map(|b| b.model.clone()))
    }

    /// The selection state bound to `view`, if a model is assigned.
    pub fn view_selection(&self, view: ObjectId) -> Result<Option<Arc<SelectionModel>>> {
        self.expect_class("get view selection", "view", "an item view", view, |c| {
            c == ObjectClass::ItemView
        })?;
        Ok(self.views.lock().get(&view).map(|b| b.selection.clone()))
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Register `handler` for events on `watched`, replacing any previous
    /// handler. Returns the watched object's identity token.
    pub fn install_event_handler(
        &self,
        watched: ObjectId,
        handler: Arc<dyn EventHandler>,
    ) -> Result<i64> {
        self.expect_class("install event handler", "watched", "a live object", watched, |_| {
            true
        })?;
        Ok(self.event_hub.install(watched, handler))
    }

    /// Stop intercepting events on `watched`. No-op if never installed.
    pub fn remove_event_handler(&self, watched: ObjectId) {
        self.event_hub.remove(watched);
    }

    /// Feed a toolkit event for `target` through the bridge.
    ///
    /// The event hub sees it first (when `target` is watched), then default
    /// processing runs: geometry and visibility bookkeeping, and GL pane
    /// resize forwarding. Interception never suppresses default processing.
    pub fn dispatch_event(&self, target: ObjectId, event: &WidgetEvent) -> Result<()> {
        self.expect_class("dispatch event", "target", "a live object", target, |_| true)?;

        if self.event_hub.is_watched(target) {
            self.event_hub.dispatch(target, event);
        }

        match *event {
            WidgetEvent::Resize { width, height, .. } => {
                {
                    let mut reg = self.registry.write();
                    if let Some(state) = reg.get_mut(target)?.widget.as_mut() {
                        state.width = width;
                        state.height = height;
                    }
                }
                let pane = self.gl_panes.lock().get(&target).cloned();
                if let Some(pane) = pane {
                    pane.resize(width, height);
                }
            }
            WidgetEvent::Show => {
                let mut reg = self.registry.write();
                if let Some(state) = reg.get_mut(target)?.widget.as_mut() {
                    state.visible = true;
                }
            }
            WidgetEvent::Hide | WidgetEvent::Close => {
                let mut reg = self.registry.write();
                if let Some(state) = reg.get_mut(target)?.widget.as_mut() {
                    state.visible = false;
                }
            }
            _ => {}
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Timer callbacks
    // -------------------------------------------------------------------------

    /// Register a periodic timer callback.
    ///
    /// The first registration starts the shared notifier at its fixed
    /// cadence; later registrations join the running cadence unchanged.
    pub fn add_timer_callback(&self, callback: Arc<dyn TickCallback>) {
        if self.tick.is_empty() {
            self.tick.start();
        }
        self.tick.add_callback(callback);
    }

    /// Remove a timer callback; stops the notifier when the last one leaves.
    ///
    /// Removing a callback that was never registered is a no-op.
    pub fn remove_timer_callback(&self, callback: &Arc<dyn TickCallback>) {
        self.tick.remove_callback(callback);
        if self.tick.is_empty() {
            self.tick.stop();
        }
    }

    // -------------------------------------------------------------------------
    // Signal connections
    // -------------------------------------------------------------------------

    /// Connect `handler` to `signal` emissions of `sender`.
    ///
    /// The signal name must be declared by the sender's class. Returns the
    /// connection cookie.
    pub fn connect(
        &self,
        sender: ObjectId,
        signal: &str,
        handler: Arc<dyn ConnectionHandler>,
    ) -> Result<i32> {
        self.expect_signal("connect", sender, signal)?;
        Ok(self.connection_hub.connect(sender, signal, handler))
    }

    /// Disconnect a connection by cookie. Unknown cookies are a no-op.
    pub fn disconnect(&self, cookie: i32) {
        self.connection_hub.disconnect(cookie);
    }

    /// Emit `signal` from `sender` through the connection hub.
    ///
    /// This is the toolkit-side emission entry: hosts call it when a native
    /// signal fires. Item-view signals additionally forward to the view's
    /// assigned model delegate, carrying the row from the first argument.
    pub fn emit_signal(&self, sender: ObjectId, signal: &str, args: &[Variant]) -> Result<()> {
        let class = self.expect_signal("emit signal", sender, signal)?;
        self.connection_hub.emit(sender, signal, args);

        if class == ObjectClass::ItemView {
            let model = self.views.lock().get(&sender).map(|b| b.model.clone());
            if let (Some(model), Some(row)) =
                (model, args.first().and_then(Variant::as_int))
            {
                model.forward_view_notification(signal, row as usize);
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Loop control
    // -------------------------------------------------------------------------

    /// Run the event loop until [`quit`](Self::quit) is called.
    ///
    /// The headless loop pumps [`process_events`](Self::process_events) and
    /// sleeps between iterations; a windowing host would drive its own loop
    /// and call `process_events` from it instead.
    pub fn exec(&self) {
        self.quit.store(false, Ordering::SeqCst);
        while !self.quit.load(Ordering::SeqCst) {
            self.process_events();
            std::thread::sleep(Duration::from_millis(1));
        }
        self.connection_hub.emit(self.app, "aboutToQuit", &[]);
    }

    /// Process pending work once: deliver a tick if one is due.
    pub fn process_events(&self) {
        self.tick.pump(Instant::now());
    }

    /// Ask a running [`exec`](Self::exec) loop to exit.
    pub fn quit(&self) {
        self.quit.store(true, Ordering::SeqCst);
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(system: &System) -> ObjectId {
        system.new_instance_of("Widget", None).unwrap()
    }

    #[test]
    fn factory_rejects_unknown_classes() {
        let system = System::new();
        let err = system.new_instance_of("TreeWidget", None).unwrap_err();
        assert!(matches!(err, BridgeError::NotSupported { .. }));

        // Case-insensitive acceptance.
        let menu = system.new_instance_of("menu", None).unwrap();
        assert_eq!(
            system.registry().read().class_of(menu),
            Some(ObjectClass::Menu)
        );
    }

    #[test]
    fn factory_parents_new_instances() {
        let system = System::new();
        let window = system.new_instance_of("MainWindow", None).unwrap();
        let child = system.new_instance_of("Widget", Some(window)).unwrap();
        assert_eq!(system.registry().read().get(child).unwrap().parent(), Some(window));
    }

    #[test]
    fn add_widget_accepts_layouts_and_splitters_only() {
        let system = System::new();
        let layout = system.new_instance_of("BoxLayout", None).unwrap();
        let splitter = system.new_instance_of("Splitter", None).unwrap();
        let action = system.new_instance_of("Action", None).unwrap();
        let a = widget(&system);
        let b = widget(&system);

        system.add_widget(layout, a).unwrap();
        system.add_widget(splitter, b).unwrap();
        assert_eq!(system.registry().read().get(layout).unwrap().items, vec![a]);

        // Wrong parent kind: rejected, and no state changes anywhere.
        let c = widget(&system);
        let err = system.add_widget(action, c).unwrap_err();
        assert!(matches!(err, BridgeError::IllegalArgument { .. }));
        assert_eq!(system.registry().read().get(c).unwrap().parent(), None);

        // Wrong child kind.
        assert!(system.add_widget(layout, action).is_err());
    }

    #[test]
    fn insert_widget_honors_position_and_append() {
        let system = System::new();
        let status_bar = system.new_instance_of("StatusBar", None).unwrap();
        let a = widget(&system);
        let b = widget(&system);
        let c = widget(&system);

        system.insert_widget(status_bar, -1, a).unwrap();
        system.insert_widget(status_bar, -1, c).unwrap();
        system.insert_widget(status_bar, 1, b).unwrap();
        assert_eq!(
            system.registry().read().get(status_bar).unwrap().items,
            vec![a, b, c]
        );

        // A plain widget is not an accepted container.
        let plain = widget(&system);
        assert!(system.insert_widget(plain, 0, a).is_err());
    }

    #[test]
    fn remove_widget_rejects_splitters() {
        let system = System::new();
        let splitter = system.new_instance_of("Splitter", None).unwrap();
        let layout = system.new_instance_of("BoxLayout", None).unwrap();
        let a = widget(&system);
        let b = widget(&system);

        system.add_widget(splitter, a).unwrap();
        system.add_widget(layout, b).unwrap();

        // Splitters accept insertion but not removal.
        assert!(system.remove_widget(splitter, a).is_err());

        system.remove_widget(layout, b).unwrap();
        assert!(system.registry().read().get(layout).unwrap().items.is_empty());
        assert_eq!(system.registry().read().get(b).unwrap().parent(), None);
    }

    #[test]
    fn dock_wiring_checks_both_kinds() {
        let system = System::new();
        let window = system.new_instance_of("MainWindow", None).unwrap();
        let dock = system.new_instance_of("DockWidget", None).unwrap();
        let content = widget(&system);

        system.add_dock_widget(window, DockArea::Right, dock).unwrap();
        system.set_widget(dock, content).unwrap();
        {
            let reg = system.registry().read();
            assert_eq!(reg.get(window).unwrap().docks, vec![(DockArea::Right, dock)]);
            assert_eq!(reg.get(dock).unwrap().content, Some(content));
        }

        assert!(system.add_dock_widget(content, DockArea::Left, dock).is_err());
        assert!(system.add_dock_widget(window, DockArea::Left, content).is_err());
    }

    #[test]
    fn layout_installation() {
        let system = System::new();
        let w = widget(&system);
        let layout = system.new_instance_of("BoxLayout", None).unwrap();

        assert_eq!(system.get_layout(w).unwrap(), None);
        system.set_layout(w, layout).unwrap();
        assert_eq!(system.get_layout(w).unwrap(), Some(layout));

        // Layout argument must actually be a layout.
        let other = widget(&system);
        assert!(system.set_layout(w, other).is_err());
    }

    #[test]
    fn action_list_edits_and_bounds() {
        let system = System::new();
        let menu = system.new_instance_of("Menu", None).unwrap();
        let first = system.new_instance_of("Action", None).unwrap();
        let second = system.new_instance_of("Action", None).unwrap();

        system.insert_action(menu, -1, first).unwrap();
        system.insert_action(menu, 0, second).unwrap();
        assert_eq!(
            system.registry().read().get(menu).unwrap().actions,
            vec![second, first]
        );

        // Non-negative indices must address an existing action.
        let third = system.new_instance_of("Action", None).unwrap();
        let err = system.insert_action(menu, 5, third).unwrap_err();
        assert!(matches!(err, BridgeError::OutOfBounds { .. }));

        system.remove_action(menu, second).unwrap();
        system.remove_action(menu, second).unwrap(); // absent: no-op
        assert_eq!(system.registry().read().get(menu).unwrap().actions, vec![first]);

        system.make_separator(first).unwrap();
        assert!(system.registry().read().get(first).unwrap().separator);
    }

    #[test]
    fn grab_and_release_mouse() {
        let system = System::new();
        let a = widget(&system);
        let b = widget(&system);

        system.grab_mouse(a).unwrap();
        system.grab_mouse(b).unwrap(); // replaces
        assert_eq!(system.mouse_grabber(), Some(b));

        system.release_mouse(a).unwrap(); // not the grabber: no-op
        assert_eq!(system.mouse_grabber(), Some(b));
        system.release_mouse(b).unwrap();
        assert_eq!(system.mouse_grabber(), None);
    }

    #[test]
    fn coordinate_mapping_uses_widget_origin() {
        let system = System::new();
        let w = widget(&system);
        system.set_widget_geometry(w, 100, 200, 640, 480).unwrap();

        assert_eq!(system.map_from_global(w, 110, 230).unwrap(), (10, 30));
        assert_eq!(system.map_to_global(w, 10, 30).unwrap(), (110, 230));

        let layout = system.new_instance_of("BoxLayout", None).unwrap();
        assert!(system.map_to_global(layout, 0, 0).is_err());
    }

    #[test]
    fn cursor_requests_are_per_widget() {
        let system = System::new();
        let w = widget(&system);
        assert_eq!(system.cursor_shape(w).unwrap(), None);

        system.set_cursor(w, CursorShape::Hand).unwrap();
        assert_eq!(system.cursor_shape(w).unwrap(), Some(CursorShape::Hand));

        system.unset_cursor(w).unwrap();
        system.unset_cursor(w).unwrap(); // no-op
        assert_eq!(system.cursor_shape(w).unwrap(), None);
    }

    #[test]
    fn connect_validates_signal_names() {
        struct Nop;
        impl ConnectionHandler for Nop {
            fn on_signal(&self, _: i32, _: i64, _: &[Variant]) {}
        }

        let system = System::new();
        let action = system.new_instance_of("Action", None).unwrap();

        let cookie = system.connect(action, "triggered", Arc::new(Nop)).unwrap();
        assert!(cookie >= 1);
        assert!(system.connect(action, "clicked", Arc::new(Nop)).is_err());

        system.disconnect(cookie);
        system.disconnect(cookie); // no-op
    }

    #[test]
    fn search_paths_resolve_prefixed_paths() {
        let dir = std::env::temp_dir().join("trellis-search-path-test");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("probe.ui");
        std::fs::write(&file, "x").unwrap();

        let system = System::new();
        system.set_search_paths("ui", vec![dir.clone()]);
        assert_eq!(system.resolve_path(Path::new("ui:probe.ui")), file);
        // Unknown prefixes pass through untouched.
        assert_eq!(
            system.resolve_path(Path::new("icons:probe.ui")),
            PathBuf::from("icons:probe.ui")
        );

        std::fs::remove_file(&file).ok();
    }

    #[test]
    fn load_ui_fails_before_delegation_when_missing() {
        let system = System::new();
        let err = system.load_ui("/definitely/not/here.ui", None).unwrap_err();
        assert!(matches!(err, BridgeError::Resource { .. }));
    }
}
