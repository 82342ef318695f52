//! Event interception and argument normalization.
//!
//! The hub keeps the watched-object registry: at most one handler per
//! object, last registration wins. On dispatch it extracts a fixed-arity
//! argument tuple from the event and invokes the handler with the object's
//! identity and the event's kind code. The hub never consumes events; the
//! toolkit's default processing always continues afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::ObjectId;

use super::events::{EventKind, KeyboardModifiers, WidgetEvent};

/// Maximum number of normalized arguments an event can carry.
pub const MAX_EVENT_ARGS: usize = 6;

/// One slot of the normalized argument tuple.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventArg {
    /// Unused slot.
    #[default]
    None,
    /// Integer argument (coordinates, button codes, sizes, deltas).
    Int(i32),
    /// String argument (key names).
    Str(String),
    /// Modifier-flags argument.
    Modifiers(KeyboardModifiers),
}

/// The fixed-arity argument tuple delivered with every event.
///
/// Slots beyond the event kind's argument count hold [`EventArg::None`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventArgs {
    slots: [EventArg; MAX_EVENT_ARGS],
}

impl EventArgs {
    /// A tuple with every slot unused.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Borrow slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= MAX_EVENT_ARGS`.
    #[inline]
    pub fn get(&self, index: usize) -> &EventArg {
        &self.slots[index]
    }

    /// Number of leading slots that carry a value.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .take_while(|a| !matches!(a, EventArg::None))
            .count()
    }

    /// Whether no slot carries a value.
    pub fn is_empty(&self) -> bool {
        matches!(self.slots[0], EventArg::None)
    }

    fn from_slice(args: &[EventArg]) -> Self {
        debug_assert!(args.len() <= MAX_EVENT_ARGS);
        let mut slots: [EventArg; MAX_EVENT_ARGS] = Default::default();
        for (slot, arg) in slots.iter_mut().zip(args) {
            *slot = arg.clone();
        }
        Self { slots }
    }
}

/// Extract the normalized argument tuple for `event`.
///
/// Pointer events yield `(x, y, button, modifiers)`; key events
/// `(key-name, modifiers)`; wheel events `(x, y, delta, modifiers)`; resize
/// events `(width, height, old_width, old_height)`. Every other kind
/// carries no arguments.
pub fn extract_arguments(event: &WidgetEvent) -> EventArgs {
    use EventArg::{Int, Modifiers, Str};
    match *event {
        WidgetEvent::MousePress {
            x,
            y,
            button,
            modifiers,
        }
        | WidgetEvent::MouseRelease {
            x,
            y,
            button,
            modifiers,
        }
        | WidgetEvent::MouseDoubleClick {
            x,
            y,
            button,
            modifiers,
        }
        | WidgetEvent::MouseMove {
            x,
            y,
            button,
            modifiers,
        } => EventArgs::from_slice(&[Int(x), Int(y), Int(button.code()), Modifiers(modifiers)]),
        WidgetEvent::KeyPress { key, modifiers } | WidgetEvent::KeyRelease { key, modifiers } => {
            EventArgs::from_slice(&[Str(key.name()), Modifiers(modifiers)])
        }
        WidgetEvent::Wheel {
            x,
            y,
            delta,
            modifiers,
        } => EventArgs::from_slice(&[Int(x), Int(y), Int(delta), Modifiers(modifiers)]),
        WidgetEvent::Resize {
            width,
            height,
            old_width,
            old_height,
        } => EventArgs::from_slice(&[Int(width), Int(height), Int(old_width), Int(old_height)]),
        _ => EventArgs::empty(),
    }
}

/// Handler object receiving normalized events for a watched object.
pub trait EventHandler: Send + Sync {
    /// Called for every intercepted event on the watched object.
    ///
    /// `source` is the watched object's identity token, `kind` the event's
    /// kind code, and `args` the normalized argument tuple.
    fn on_event(&self, source: i64, kind: EventKind, args: &EventArgs);
}

/// The watched-object registry.
///
/// Owned by the system facade; one hub serves the whole process.
pub struct EventHub {
    watched: Mutex<HashMap<ObjectId, Arc<dyn EventHandler>>>,
}

impl EventHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self {
            watched: Mutex::new(HashMap::new()),
        }
    }

    /// Register `handler` for `watched`, replacing any previous handler.
    ///
    /// Returns the object's identity token, the same value later passed as
    /// `source` to the handler.
    pub fn install(&self, watched: ObjectId, handler: Arc<dyn EventHandler>) -> i64 {
        let replaced = self.watched.lock().insert(watched, handler).is_some();
        tracing::debug!(target: "trellis::event_hub", ?watched, replaced, "event handler installed");
        watched.as_raw() as i64
    }

    /// Remove the handler for `watched`. No-op if none is registered.
    pub fn remove(&self, watched: ObjectId) {
        if self.watched.lock().remove(&watched).is_some() {
            tracing::debug!(target: "trellis::event_hub", ?watched, "event handler removed");
        }
    }

    /// Whether `watched` currently has a handler.
    pub fn is_watched(&self, watched: ObjectId) -> bool {
        self.watched.lock().contains_key(&watched)
    }

    /// Number of watched objects.
    pub fn watched_count(&self) -> usize {
        self.watched.lock().len()
    }

    /// Intercept `event` for `watched`.
    ///
    /// Returns `false` always: the hub observes, it never filters, so the
    /// caller must continue the toolkit's default processing.
    ///
    /// # Panics
    ///
    /// Dispatching for an object with no registered handler is a programming
    /// error; callers check [`EventHub::is_watched`] first.
    pub fn dispatch(&self, watched: ObjectId, event: &WidgetEvent) -> bool {
        let handler = self
            .watched
            .lock()
            .get(&watched)
            .cloned()
            .expect("event dispatched for an object with no registered handler");

        let args = extract_arguments(event);
        handler.on_event(watched.as_raw() as i64, event.kind(), &args);
        false
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::events::{Key, MouseButton};
    use trellis_core::{ObjectClass, ObjectRegistry};

    struct Recorder(Mutex<Vec<(i64, EventKind, EventArgs)>>);

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Vec::new())))
        }
    }

    impl EventHandler for Recorder {
        fn on_event(&self, source: i64, kind: EventKind, args: &EventArgs) {
            self.0.lock().push((source, kind, args.clone()));
        }
    }

    fn some_object() -> ObjectId {
        ObjectRegistry::new().create(ObjectClass::Widget)
    }

    #[test]
    fn click_extraction_is_exactly_x_y_button_modifiers() {
        let args = extract_arguments(&WidgetEvent::MousePress {
            x: 12,
            y: 34,
            button: MouseButton::Left,
            modifiers: KeyboardModifiers::CTRL,
        });
        assert_eq!(args.len(), 4);
        assert_eq!(args.get(0), &EventArg::Int(12));
        assert_eq!(args.get(1), &EventArg::Int(34));
        assert_eq!(args.get(2), &EventArg::Int(MouseButton::Left.code()));
        assert_eq!(
            args.get(3),
            &EventArg::Modifiers(KeyboardModifiers::CTRL)
        );
        assert_eq!(args.get(4), &EventArg::None);
    }

    #[test]
    fn resize_extraction_is_exactly_new_then_old_size() {
        let args = extract_arguments(&WidgetEvent::Resize {
            width: 800,
            height: 600,
            old_width: 640,
            old_height: 480,
        });
        assert_eq!(args.len(), 4);
        assert_eq!(args.get(0), &EventArg::Int(800));
        assert_eq!(args.get(1), &EventArg::Int(600));
        assert_eq!(args.get(2), &EventArg::Int(640));
        assert_eq!(args.get(3), &EventArg::Int(480));
    }

    #[test]
    fn key_and_wheel_and_bare_kinds() {
        let args = extract_arguments(&WidgetEvent::KeyPress {
            key: Key::Character('q'),
            modifiers: KeyboardModifiers::NONE,
        });
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0), &EventArg::Str("Q".into()));

        let args = extract_arguments(&WidgetEvent::Wheel {
            x: 1,
            y: 2,
            delta: -120,
            modifiers: KeyboardModifiers::NONE,
        });
        assert_eq!(args.get(2), &EventArg::Int(-120));

        assert!(extract_arguments(&WidgetEvent::Show).is_empty());
        assert!(extract_arguments(&WidgetEvent::Close).is_empty());
    }

    #[test]
    fn install_replaces_previous_handler() {
        let hub = EventHub::new();
        let object = some_object();
        let first = Recorder::new();
        let second = Recorder::new();

        let token_a = hub.install(object, first.clone());
        let token_b = hub.install(object, second.clone());
        assert_eq!(token_a, token_b);
        assert_eq!(hub.watched_count(), 1);

        hub.dispatch(object, &WidgetEvent::Enter);
        assert!(first.0.lock().is_empty());
        assert_eq!(second.0.lock().len(), 1);
    }

    #[test]
    fn dispatch_reports_identity_and_kind_and_continues() {
        let hub = EventHub::new();
        let object = some_object();
        let recorder = Recorder::new();
        let token = hub.install(object, recorder.clone());

        let filtered = hub.dispatch(
            object,
            &WidgetEvent::MouseMove {
                x: 5,
                y: 6,
                button: MouseButton::None,
                modifiers: KeyboardModifiers::NONE,
            },
        );
        assert!(!filtered);

        let seen = recorder.0.lock();
        let (source, kind, _) = &seen[0];
        assert_eq!(*source, token);
        assert_eq!(*kind, EventKind::MouseMove);
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let hub = EventHub::new();
        let object = some_object();
        hub.remove(object); // never registered

        let recorder = Recorder::new();
        hub.install(object, recorder);
        hub.remove(object);
        hub.remove(object);
        assert!(!hub.is_watched(object));
    }

    #[test]
    #[should_panic(expected = "no registered handler")]
    fn dispatch_without_handler_is_a_programming_error() {
        let hub = EventHub::new();
        hub.dispatch(some_object(), &WidgetEvent::Show);
    }
}
