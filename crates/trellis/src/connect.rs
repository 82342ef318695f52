//! Signal connection hub.
//!
//! Boundary-facing signal/slot plumbing: components connect a handler to a
//! named signal of a toolkit object and receive an integer cookie for later
//! disconnection. The hub owns the cookie table; signal-name validation
//! against the sender's class happens in the facade before registration.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use parking_lot::Mutex;
use trellis_core::ObjectId;

use crate::variant::Variant;

/// Handler object receiving signal notifications for a connection.
pub trait ConnectionHandler: Send + Sync {
    /// Called when the connected signal fires.
    ///
    /// `cookie` identifies the connection, `sender` the emitting object's
    /// identity token, and `args` the signal's arguments.
    fn on_signal(&self, cookie: i32, sender: i64, args: &[Variant]);
}

struct Connection {
    cookie: i32,
    sender: ObjectId,
    signal: String,
    handler: Arc<dyn ConnectionHandler>,
}

/// The connection-cookie table.
///
/// Owned by the system facade; one hub serves the whole process. Cookies
/// start at 1 and are never reused within a hub's lifetime.
pub struct ConnectionHub {
    connections: Mutex<Vec<Connection>>,
    next_cookie: AtomicI32,
}

impl ConnectionHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(Vec::new()),
            next_cookie: AtomicI32::new(1),
        }
    }

    /// Register `handler` for `signal` emissions of `sender`.
    ///
    /// Returns the connection's cookie.
    pub fn connect(
        &self,
        sender: ObjectId,
        signal: impl Into<String>,
        handler: Arc<dyn ConnectionHandler>,
    ) -> i32 {
        let cookie = self.next_cookie.fetch_add(1, Ordering::Relaxed);
        let signal = signal.into();
        tracing::debug!(target: "trellis::connect", ?sender, %signal, cookie, "connected");
        self.connections.lock().push(Connection {
            cookie,
            sender,
            signal,
            handler,
        });
        cookie
    }

    /// Remove the connection identified by `cookie`.
    ///
    /// Disconnecting an unknown or already-disconnected cookie is a no-op.
    /// Takes effect for the next emission; an emission already in flight
    /// completes with the old connection list.
    pub fn disconnect(&self, cookie: i32) {
        let mut connections = self.connections.lock();
        let before = connections.len();
        connections.retain(|c| c.cookie != cookie);
        if connections.len() != before {
            tracing::debug!(target: "trellis::connect", cookie, "disconnected");
        }
    }

    /// Drop every connection whose sender is `sender`.
    ///
    /// Used when a sender object is destroyed.
    pub fn disconnect_sender(&self, sender: ObjectId) {
        self.connections.lock().retain(|c| c.sender != sender);
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Route an emission of `signal` from `sender` to every matching handler.
    ///
    /// Handlers run in connection order, outside the hub's lock.
    pub fn emit(&self, sender: ObjectId, signal: &str, args: &[Variant]) {
        let matching: Vec<(i32, Arc<dyn ConnectionHandler>)> = self
            .connections
            .lock()
            .iter()
            .filter(|c| c.sender == sender && c.signal == signal)
            .map(|c| (c.cookie, c.handler.clone()))
            .collect();

        let sender_token = sender.as_raw() as i64;
        for (cookie, handler) in matching {
            handler.on_signal(cookie, sender_token, args);
        }
    }
}

impl Default for ConnectionHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{ObjectClass, ObjectRegistry};

    struct Recorder(Mutex<Vec<(i32, i64, Vec<Variant>)>>);

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Vec::new())))
        }
    }

    impl ConnectionHandler for Recorder {
        fn on_signal(&self, cookie: i32, sender: i64, args: &[Variant]) {
            self.0.lock().push((cookie, sender, args.to_vec()));
        }
    }

    #[test]
    fn connect_emit_disconnect() {
        let hub = ConnectionHub::new();
        let mut registry = ObjectRegistry::new();
        let action = registry.create(ObjectClass::Action);
        let recorder = Recorder::new();

        let cookie = hub.connect(action, "triggered", recorder.clone());
        assert!(cookie >= 1);

        hub.emit(action, "triggered", &[Variant::from(true)]);
        hub.emit(action, "toggled", &[]); // not connected
        {
            let seen = recorder.0.lock();
            assert_eq!(seen.len(), 1);
            assert_eq!(seen[0].0, cookie);
            assert_eq!(seen[0].1, action.as_raw() as i64);
            assert_eq!(seen[0].2, vec![Variant::from(true)]);
        }

        hub.disconnect(cookie);
        hub.emit(action, "triggered", &[]);
        assert_eq!(recorder.0.lock().len(), 1);
    }

    #[test]
    fn cookies_are_unique_and_unknown_disconnect_is_noop() {
        let hub = ConnectionHub::new();
        let mut registry = ObjectRegistry::new();
        let menu = registry.create(ObjectClass::Menu);
        let recorder = Recorder::new();

        let a = hub.connect(menu, "triggered", recorder.clone());
        let b = hub.connect(menu, "aboutToShow", recorder.clone());
        assert_ne!(a, b);

        hub.disconnect(9999); // never issued
        hub.disconnect(b);
        hub.disconnect(b); // already gone
        assert_eq!(hub.connection_count(), 1);
    }

    #[test]
    fn emission_is_scoped_to_sender_and_name() {
        let hub = ConnectionHub::new();
        let mut registry = ObjectRegistry::new();
        let first = registry.create(ObjectClass::Action);
        let second = registry.create(ObjectClass::Action);
        let recorder = Recorder::new();

        hub.connect(first, "triggered", recorder.clone());
        hub.emit(second, "triggered", &[]);
        assert!(recorder.0.lock().is_empty());

        hub.disconnect_sender(first);
        hub.emit(first, "triggered", &[]);
        assert!(recorder.0.lock().is_empty());
    }
}
