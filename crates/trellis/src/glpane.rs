//! GL pane bridge.
//!
//! Forwards the three GL lifecycle events of a pane to a pluggable painter.
//! The pane itself draws nothing: an absent painter makes every lifecycle
//! call a no-op.

use std::sync::Arc;

use parking_lot::RwLock;
use trellis_core::ObjectId;

/// Painter object receiving a pane's GL lifecycle.
pub trait GlPainter: Send + Sync {
    /// Called once before the first paint, with the GL context current.
    fn initialize(&self);
    /// Called whenever the pane must repaint.
    fn paint(&self);
    /// Called when the pane's drawable size changes.
    fn resize(&self, width: i32, height: i32);
}

/// Bridges a GL pane object to its painter.
pub struct GlPaneBridge {
    widget: ObjectId,
    painter: RwLock<Option<Arc<dyn GlPainter>>>,
}

impl GlPaneBridge {
    /// Creates a bridge for the pane object `widget` with no painter.
    pub fn new(widget: ObjectId) -> Self {
        Self {
            widget,
            painter: RwLock::new(None),
        }
    }

    /// The pane's object handle.
    pub fn widget(&self) -> ObjectId {
        self.widget
    }

    /// Attach or clear the painter.
    pub fn set_painter(&self, painter: Option<Arc<dyn GlPainter>>) {
        *self.painter.write() = painter;
    }

    /// The attached painter, if any.
    pub fn painter(&self) -> Option<Arc<dyn GlPainter>> {
        self.painter.read().clone()
    }

    /// Forward `initialize` to the painter, if attached.
    pub fn initialize(&self) {
        if let Some(painter) = self.painter() {
            painter.initialize();
        }
    }

    /// Forward `paint` to the painter, if attached.
    pub fn paint(&self) {
        if let Some(painter) = self.painter() {
            painter.paint();
        }
    }

    /// Forward `resize` to the painter, if attached.
    pub fn resize(&self, width: i32, height: i32) {
        if let Some(painter) = self.painter() {
            painter.resize(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use trellis_core::{ObjectClass, ObjectRegistry};

    struct Recorder(Mutex<Vec<String>>);

    impl GlPainter for Recorder {
        fn initialize(&self) {
            self.0.lock().push("initialize".into());
        }
        fn paint(&self) {
            self.0.lock().push("paint".into());
        }
        fn resize(&self, width: i32, height: i32) {
            self.0.lock().push(format!("resize {width}x{height}"));
        }
    }

    #[test]
    fn lifecycle_without_painter_is_noop() {
        let mut registry = ObjectRegistry::new();
        let pane = GlPaneBridge::new(registry.create(ObjectClass::GlPane));
        pane.initialize();
        pane.paint();
        pane.resize(100, 100);
        assert!(pane.painter().is_none());
    }

    #[test]
    fn lifecycle_forwards_to_painter() {
        let mut registry = ObjectRegistry::new();
        let pane = GlPaneBridge::new(registry.create(ObjectClass::GlPane));
        let painter = Arc::new(Recorder(Mutex::new(Vec::new())));
        pane.set_painter(Some(painter.clone()));

        pane.initialize();
        pane.resize(640, 480);
        pane.paint();
        assert_eq!(
            *painter.0.lock(),
            vec!["initialize", "resize 640x480", "paint"]
        );

        pane.set_painter(None);
        pane.paint();
        assert_eq!(painter.0.lock().len(), 3);
    }
}
