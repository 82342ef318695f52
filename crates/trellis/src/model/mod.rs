//! Model/View bridging.
//!
//! A delegate-backed rendition of the toolkit's model/view protocol:
//! [`ItemModelBridge`] answers every model query by forwarding to a
//! [`ModelDelegate`], addresses items through [`ModelIndex`] triples, and
//! tracks per-view row selection in [`SelectionModel`].

mod bridge;
mod index;
mod selection;
mod traits;

pub use bridge::{ItemModelBridge, ModelSignals};
pub use index::ModelIndex;
pub use selection::SelectionModel;
pub use traits::{ItemFlags, ItemRole, ModelDelegate, Orientation};
