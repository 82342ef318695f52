//! Convenience re-exports for typical bridge hosts.
//!
//! ```
//! use trellis::prelude::*;
//! ```

pub use crate::connect::ConnectionHandler;
pub use crate::cursor::CursorShape;
pub use crate::error::{BridgeError, Result};
pub use crate::event::{
    EventArg, EventArgs, EventHandler, EventKind, Key, KeyboardModifiers, MouseButton, WidgetEvent,
};
pub use crate::glpane::{GlPaneBridge, GlPainter};
pub use crate::model::{
    ItemFlags, ItemModelBridge, ItemRole, ModelDelegate, ModelIndex, Orientation, SelectionModel,
};
pub use crate::platform::{HeadlessPlatform, Platform};
pub use crate::system::System;
pub use crate::variant::{Brush, BrushStyle, Color, Extent, FontSpec, Icon, Variant};
pub use trellis_core::{DockArea, ObjectClass, ObjectId, TickCallback};
