//! Logging facilities for Trellis.
//!
//! Trellis instruments itself with the `tracing` crate. Hosts install a
//! subscriber (e.g. `tracing_subscriber::fmt::init()`) to see logs; the
//! constants here give stable target names for filtering.

use std::fmt::Write as FmtWrite;

use crate::object::{ObjectId, ObjectRegistry};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem, e.g.
/// `RUST_LOG=trellis::event_hub=trace`.
pub mod targets {
    /// Object registry lifecycle.
    pub const OBJECT: &str = "trellis_core::object";
    /// Tick notifier scheduling.
    pub const TICK: &str = "trellis_core::tick";
    /// Event hub installation and dispatch.
    pub const EVENT_HUB: &str = "trellis::event_hub";
    /// Connection hub registration and routing.
    pub const CONNECT: &str = "trellis::connect";
    /// System facade boundary operations.
    pub const SYSTEM: &str = "trellis::system";
    /// Item model bridge notifications.
    pub const MODEL: &str = "trellis::model";
}

/// Render an object subtree as an indented text tree, for debugging.
///
/// Shows each object's class, name (when set) and child count.
pub fn format_tree(registry: &ObjectRegistry, root: ObjectId) -> String {
    let mut out = String::new();
    format_node(registry, root, 0, &mut out);
    out
}

fn format_node(registry: &ObjectRegistry, id: ObjectId, depth: usize, out: &mut String) {
    let Ok(data) = registry.get(id) else {
        return;
    };
    for _ in 0..depth {
        out.push_str("  ");
    }
    let _ = if data.name().is_empty() {
        writeln!(out, "{} ({:?})", data.class(), id)
    } else {
        writeln!(out, "{} \"{}\" ({:?})", data.class(), data.name(), id)
    };
    for &child in data.children() {
        format_node(registry, child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectClass;

    #[test]
    fn tree_formatting() {
        let mut reg = ObjectRegistry::new();
        let window = reg.create(ObjectClass::MainWindow);
        reg.set_name(window, "main").unwrap();
        let child = reg.create(ObjectClass::Widget);
        reg.set_parent(child, Some(window)).unwrap();

        let tree = format_tree(&reg, window);
        assert!(tree.starts_with("MainWindow \"main\""));
        assert!(tree.contains("\n  Widget"));
    }
}
