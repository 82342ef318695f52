//! Event interception and normalization.
//!
//! [`EventHub`] watches toolkit objects and forwards each intercepted event
//! to a registered [`EventHandler`] as an `(identity, kind, argument-tuple)`
//! triple; [`events`] defines the toolkit-side event types the hub
//! normalizes.

mod events;
mod hub;

pub use events::{EventKind, Key, KeyboardModifiers, MouseButton, WidgetEvent};
pub use hub::{EventArg, EventArgs, EventHandler, EventHub, MAX_EVENT_ARGS, extract_arguments};
