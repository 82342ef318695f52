//! Core systems for Trellis.
//!
//! This crate holds the substrate the bridge crate builds on:
//!
//! - [`object`] - the arena-backed toolkit object model with its closed
//!   [`ObjectClass`] capability set
//! - [`signal`] - the direct-delivery signal/slot primitive
//! - [`tick`] - the shared periodic tick notifier behind timer callbacks
//! - [`logging`] - tracing targets and debug helpers
//!
//! Everything here is toolkit-side machinery; the component-facing surface
//! (variant marshaling, event extraction, the system facade) lives in the
//! `trellis` crate.

pub mod logging;
pub mod object;
pub mod signal;
pub mod tick;

pub use object::{
    DockArea, ObjectClass, ObjectData, ObjectError, ObjectId, ObjectRegistry, ObjectResult,
    SharedObjectRegistry, WidgetState,
};
pub use signal::{Signal, SlotId};
pub use tick::{TickCallback, TickNotifier};
