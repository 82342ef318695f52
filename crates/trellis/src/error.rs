//! Error types for boundary operations.
//!
//! Every cross-boundary call validates its arguments synchronously and fails
//! before any toolkit state changes; there is no partial mutation on error
//! and no retry logic. Internal invariant violations (dispatching with no
//! delegate or handler registered, unbalanced begin/end pairs) are
//! programming errors and panic instead of returning one of these.

use std::path::PathBuf;

use trellis_core::ObjectError;

/// Result type alias for boundary operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors reported across the component boundary.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// An object handle had the wrong class for the operation.
    #[error("cannot {call}: '{arg}' is not {expected} (got {got})")]
    IllegalArgument {
        /// The operation, phrased as in its name ("add widget").
        call: &'static str,
        /// Which argument was rejected.
        arg: &'static str,
        /// The class set the operation accepts.
        expected: &'static str,
        /// What was actually passed.
        got: String,
    },

    /// The factory was asked for a class outside the supported set.
    #[error("cannot create new instance for class '{class}': class not supported")]
    NotSupported {
        /// The requested class name.
        class: String,
    },

    /// A resource could not be opened.
    #[error("could not open '{}'", path.display())]
    Resource {
        /// The path that failed to open.
        path: PathBuf,
    },

    /// An index argument fell outside the valid range.
    #[error("cannot {call}: '{arg}' out-of-bounds")]
    OutOfBounds {
        /// The operation.
        call: &'static str,
        /// Which argument was rejected.
        arg: &'static str,
    },

    /// A platform-delegated operation failed in the host layer.
    #[error("platform error: {0}")]
    Platform(String),

    /// A handle did not resolve to a live object.
    #[error(transparent)]
    Object(#[from] ObjectError),
}

impl BridgeError {
    /// Helper for the common wrong-class rejection.
    pub(crate) fn illegal(
        call: &'static str,
        arg: &'static str,
        expected: &'static str,
        got: impl Into<String>,
    ) -> Self {
        Self::IllegalArgument {
            call,
            arg,
            expected,
            got: got.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_read_like_boundary_diagnostics() {
        let err = BridgeError::illegal("add widget", "parent", "a layout or splitter", "Action");
        assert_eq!(
            err.to_string(),
            "cannot add widget: 'parent' is not a layout or splitter (got Action)"
        );

        let err = BridgeError::NotSupported {
            class: "QWidget".into(),
        };
        assert!(err.to_string().contains("class not supported"));
    }
}
