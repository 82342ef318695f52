//! The host windowing seam.
//!
//! Everything the bridge cannot do without a real windowing system funnels
//! through [`Platform`]: UI-description loading, native file dialogs,
//! blocking menu execution and the global cursor. The facade validates
//! object kinds *before* delegating here, so implementations receive only
//! well-formed requests.
//!
//! [`HeadlessPlatform`] is the default: it answers every dialog with
//! "dismissed" and keeps a virtual global cursor, which is exactly what
//! tests want.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::{ObjectId, SharedObjectRegistry};

use crate::error::{BridgeError, Result};

/// Host-delegated operations.
///
/// `exec_menu` is the one suspending call in the system: implementations
/// block the calling context until the user selects one of `actions` or
/// dismisses the menu, then resume with the outcome. Cancellation is
/// "dismissed with no selection", i.e. `None`.
pub trait Platform: Send + Sync {
    /// Build a widget tree from the UI description at `path`.
    ///
    /// The facade has already verified the file exists and that `parent`,
    /// when given, is a widget. Returns the root widget of the loaded tree.
    fn load_ui(
        &self,
        registry: &SharedObjectRegistry,
        path: &Path,
        parent: Option<ObjectId>,
    ) -> Result<ObjectId>;

    /// Ask the user for an existing directory. `None` means dismissed.
    fn existing_directory(
        &self,
        parent: Option<ObjectId>,
        caption: &str,
        initial_dir: &Path,
    ) -> Option<PathBuf>;

    /// Ask the user for zero or more files to open.
    fn open_file_names(
        &self,
        parent: Option<ObjectId>,
        caption: &str,
        initial_dir: &Path,
        filter: &str,
    ) -> Vec<PathBuf>;

    /// Run `menu` at global position `pos` until a terminal user action.
    ///
    /// Returns the selected action from `actions`, or `None` if dismissed.
    fn exec_menu(&self, menu: ObjectId, actions: &[ObjectId], pos: (i32, i32)) -> Option<ObjectId>;

    /// The global pointer position.
    fn cursor_position(&self) -> (i32, i32);

    /// Move the global pointer.
    fn set_cursor_position(&self, x: i32, y: i32);
}

/// The windowless default platform.
pub struct HeadlessPlatform {
    cursor: Mutex<(i32, i32)>,
}

impl HeadlessPlatform {
    /// Create a headless platform with the cursor at the origin.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            cursor: Mutex::new((0, 0)),
        })
    }
}

impl Platform for HeadlessPlatform {
    fn load_ui(
        &self,
        _registry: &SharedObjectRegistry,
        path: &Path,
        _parent: Option<ObjectId>,
    ) -> Result<ObjectId> {
        Err(BridgeError::Platform(format!(
            "headless platform cannot load UI description '{}'",
            path.display()
        )))
    }

    fn existing_directory(
        &self,
        _parent: Option<ObjectId>,
        _caption: &str,
        _initial_dir: &Path,
    ) -> Option<PathBuf> {
        None
    }

    fn open_file_names(
        &self,
        _parent: Option<ObjectId>,
        _caption: &str,
        _initial_dir: &Path,
        _filter: &str,
    ) -> Vec<PathBuf> {
        Vec::new()
    }

    fn exec_menu(
        &self,
        _menu: ObjectId,
        _actions: &[ObjectId],
        _pos: (i32, i32),
    ) -> Option<ObjectId> {
        None
    }

    fn cursor_position(&self) -> (i32, i32) {
        *self.cursor.lock()
    }

    fn set_cursor_position(&self, x: i32, y: i32) {
        *self.cursor.lock() = (x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_dismisses_everything() {
        let platform = HeadlessPlatform::new();
        assert!(platform.existing_directory(None, "Pick", Path::new("/")).is_none());
        assert!(platform.open_file_names(None, "Open", Path::new("/"), "*").is_empty());

        platform.set_cursor_position(40, 50);
        assert_eq!(platform.cursor_position(), (40, 50));

        let registry = SharedObjectRegistry::new();
        assert!(platform.load_ui(&registry, Path::new("x.ui"), None).is_err());
    }
}
