//! Cursor shapes for widget cursor control.
//!
//! The boundary's cursor codes map onto the platform-neutral `cursor-icon`
//! vocabulary; the facade stores the active shape on the widget and the host
//! applies the mapped [`CursorIcon`] when the pointer is over it.

use cursor_icon::CursorIcon;

/// The closed set of cursor shapes a widget can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorShape {
    /// The default arrow cursor.
    #[default]
    Arrow,
    /// A crosshair, for precise picking.
    Crosshair,
    /// A pointing hand, for links and hot areas.
    Hand,
    /// A text-insertion beam.
    IBeam,
    /// A wait/busy indicator.
    Wait,
    /// Arrow with a small busy indicator.
    Busy,
    /// An action-not-allowed sign.
    Forbidden,
    /// A context-help indicator.
    WhatsThis,
    /// Horizontal resize.
    SizeHorizontal,
    /// Vertical resize.
    SizeVertical,
    /// Omnidirectional resize/move.
    SizeAll,
    /// An open hand, for draggable content.
    OpenHand,
    /// A closed hand, while dragging.
    ClosedHand,
    /// No cursor at all.
    Blank,
}

impl CursorShape {
    /// The platform cursor icon for this shape.
    pub fn icon(self) -> CursorIcon {
        match self {
            Self::Arrow => CursorIcon::Default,
            Self::Crosshair => CursorIcon::Crosshair,
            Self::Hand => CursorIcon::Pointer,
            Self::IBeam => CursorIcon::Text,
            Self::Wait => CursorIcon::Wait,
            Self::Busy => CursorIcon::Progress,
            Self::Forbidden => CursorIcon::NotAllowed,
            Self::WhatsThis => CursorIcon::Help,
            Self::SizeHorizontal => CursorIcon::EwResize,
            Self::SizeVertical => CursorIcon::NsResize,
            Self::SizeAll => CursorIcon::Move,
            Self::OpenHand => CursorIcon::Grab,
            Self::ClosedHand => CursorIcon::Grabbing,
            // cursor-icon has no "none"; hosts hide the pointer themselves.
            Self::Blank => CursorIcon::Default,
        }
    }
}
