//! Signal/slot primitive for Trellis.
//!
//! A trimmed, Qt-inspired signal type used by the bridge layers for
//! structural notifications (model row changes, selection changes). Delivery
//! is always direct: the bridge runs on one logical GUI thread, so there is
//! no queued or cross-thread variant here.
//!
//! # Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let rows_inserted = Signal::<(usize, usize)>::new();
//! let id = rows_inserted.connect(|&(first, last)| {
//!     assert!(first <= last);
//! });
//! rows_inserted.emit((0, 2));
//! rows_inserted.disconnect(id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Remains valid until the connection is disconnected or the signal is
    /// dropped.
    pub struct SlotId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A signal with any number of connected slots.
///
/// Slots are invoked in connection order. The slot list is cloned out of the
/// lock before invocation, so a slot may connect or disconnect other slots
/// (including itself) while the signal is being emitted; such changes take
/// effect for the next emission.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<SlotId, Slot<Args>>>,
}

impl<Args> Signal<Args> {
    /// Create a signal with no connections.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect a slot, returning its connection id.
    pub fn connect<F>(&self, slot: F) -> SlotId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.slots.lock().insert(Arc::new(slot))
    }

    /// Disconnect a slot. Returns `false` if the id was already gone.
    pub fn disconnect(&self, id: SlotId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// Remove every connection.
    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    /// Invoke all connected slots with `args`.
    pub fn emit(&self, args: Args) {
        // Clone the slots out so no lock is held during user code.
        let slots: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        for slot in slots {
            slot(&args);
        }
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Whether no slots are connected.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_emit_disconnect() {
        let signal = Signal::<i32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let id = signal.connect(move |&v| sink.lock().push(v));
        assert_eq!(signal.connection_count(), 1);

        signal.emit(7);
        signal.emit(8);
        assert_eq!(*seen.lock(), vec![7, 8]);

        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(9);
        assert_eq!(*seen.lock(), vec![7, 8]);
    }

    #[test]
    fn slots_run_in_connection_order() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let sink = order.clone();
            signal.connect(move |_| sink.lock().push(tag));
        }
        signal.emit(());
        assert_eq!(*order.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn reentrant_disconnect_does_not_deadlock() {
        let signal = Arc::new(Signal::<()>::new());
        let inner = signal.clone();
        let id = Arc::new(Mutex::new(None));
        let id_ref = id.clone();
        let stored = signal.connect(move |_| {
            if let Some(me) = id_ref.lock().take() {
                inner.disconnect(me);
            }
        });
        *id.lock() = Some(stored);

        signal.emit(());
        assert_eq!(signal.connection_count(), 0);
        signal.emit(()); // nothing left to run
    }
}
