//! Trellis: a component-runtime bridge onto an embedded widget toolkit.
//!
//! Trellis exposes a widget toolkit's object model to a component runtime
//! through a validated pass-through surface. Components hold opaque object
//! handles and tagged value containers; every call is checked against the
//! toolkit's closed class set before any state changes, and failures are
//! reported through one error taxonomy instead of crashing.
//!
//! # Architecture
//!
//! - [`System`](system::System) - the facade and composition root: factory,
//!   hierarchy, action/menu, cursor, model/view, event, timer and connection
//!   operations
//! - [`EventHub`](event::EventHub) - event interception with normalized
//!   fixed-arity argument tuples
//! - [`ItemModelBridge`](model::ItemModelBridge) - a delegate-backed
//!   rendition of the toolkit's model/view protocol
//! - [`GlPaneBridge`](glpane::GlPaneBridge) - GL lifecycle forwarding to a
//!   pluggable painter
//! - [`Variant`](variant::Variant) - the tagged value container crossing the
//!   boundary
//! - [`Platform`](platform::Platform) - the host windowing seam (dialogs,
//!   UI loading, blocking menus, global cursor)
//!
//! The toolkit-side substrate (object registry, signals, tick timer) lives
//! in `trellis-core`.
//!
//! # Example
//!
//! ```
//! use trellis::system::System;
//!
//! let system = System::new();
//! let layout = system.new_instance_of("BoxLayout", None)?;
//! let button = system.new_instance_of("Widget", None)?;
//! system.add_widget(layout, button)?;
//! # Ok::<(), trellis::error::BridgeError>(())
//! ```

pub mod connect;
pub mod cursor;
pub mod error;
pub mod event;
pub mod glpane;
pub mod model;
pub mod platform;
pub mod system;
pub mod variant;

pub mod prelude;

pub use connect::{ConnectionHandler, ConnectionHub};
pub use cursor::CursorShape;
pub use error::{BridgeError, Result};
pub use event::{EventArg, EventArgs, EventHandler, EventHub, EventKind, WidgetEvent};
pub use glpane::{GlPaneBridge, GlPainter};
pub use model::{ItemModelBridge, ModelDelegate, ModelIndex};
pub use platform::{HeadlessPlatform, Platform};
pub use system::System;
pub use variant::Variant;
