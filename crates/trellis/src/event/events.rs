//! Toolkit event types seen by the event hub.
//!
//! These are the events the host's dispatcher feeds through the bridge.
//! Only the kinds the boundary normalizes carry payloads; everything else
//! crosses as a bare kind code.

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum MouseButton {
    /// No button (e.g. a plain pointer move).
    #[default]
    None = 0,
    /// Primary button (usually left).
    Left = 1,
    /// Secondary button (usually right).
    Right = 2,
    /// Middle button (scroll wheel click).
    Middle = 3,
}

impl MouseButton {
    /// The integer code forwarded to event handlers.
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held.
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
    /// The key originates from the numeric keypad.
    pub keypad: bool,
    /// The group-switch (AltGr) modifier is held.
    pub group_switch: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
        keypad: false,
        group_switch: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
        keypad: false,
        group_switch: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
        keypad: false,
        group_switch: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        meta: false,
        keypad: false,
        group_switch: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta || self.keypad || self.group_switch
    }
}

/// Keys reported by key events.
///
/// Printable keys travel as [`Key::Character`]; everything else is a named
/// key from the closed set below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character key.
    Character(char),
    /// The Escape key.
    Escape,
    /// The Tab key.
    Tab,
    /// The Backspace key.
    Backspace,
    /// The Return key.
    Return,
    /// The Insert key.
    Insert,
    /// The Delete key.
    Delete,
    /// The Home key.
    Home,
    /// The End key.
    End,
    /// The left arrow key.
    Left,
    /// The up arrow key.
    Up,
    /// The right arrow key.
    Right,
    /// The down arrow key.
    Down,
    /// The Page Up key.
    PageUp,
    /// The Page Down key.
    PageDown,
    /// The Shift key itself.
    Shift,
    /// The Control key itself.
    Control,
    /// The Alt key itself.
    Alt,
    /// The Meta key itself.
    Meta,
    /// The space bar.
    Space,
    /// A function key (1-based).
    Function(u8),
}

impl Key {
    /// The key's name as forwarded to event handlers.
    ///
    /// Character keys report their uppercased character; function keys
    /// report `F<n>`.
    pub fn name(&self) -> String {
        match self {
            Self::Character(c) => c.to_uppercase().collect(),
            Self::Escape => "Escape".into(),
            Self::Tab => "Tab".into(),
            Self::Backspace => "Backspace".into(),
            Self::Return => "Return".into(),
            Self::Insert => "Insert".into(),
            Self::Delete => "Delete".into(),
            Self::Home => "Home".into(),
            Self::End => "End".into(),
            Self::Left => "Left".into(),
            Self::Up => "Up".into(),
            Self::Right => "Right".into(),
            Self::Down => "Down".into(),
            Self::PageUp => "PageUp".into(),
            Self::PageDown => "PageDown".into(),
            Self::Shift => "Shift".into(),
            Self::Control => "Control".into(),
            Self::Alt => "Alt".into(),
            Self::Meta => "Meta".into(),
            Self::Space => "Space".into(),
            Self::Function(n) => format!("F{n}"),
        }
    }
}

/// Kind codes identifying toolkit events at the component boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EventKind {
    /// A mouse button was pressed.
    MousePress = 2,
    /// A mouse button was released.
    MouseRelease = 3,
    /// A mouse button was double-clicked.
    MouseDoubleClick = 4,
    /// The pointer moved.
    MouseMove = 5,
    /// A key was pressed.
    KeyPress = 6,
    /// A key was released.
    KeyRelease = 7,
    /// The object gained keyboard focus.
    FocusIn = 8,
    /// The object lost keyboard focus.
    FocusOut = 9,
    /// The pointer entered the object.
    Enter = 10,
    /// The pointer left the object.
    Leave = 11,
    /// The object was resized.
    Resize = 14,
    /// The object was shown.
    Show = 17,
    /// The object was hidden.
    Hide = 18,
    /// The object was asked to close.
    Close = 19,
    /// The mouse wheel turned.
    Wheel = 31,
}

impl EventKind {
    /// The integer code forwarded to event handlers.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// A toolkit event, as fed to [`crate::event::EventHub`] by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// A mouse button was pressed at (x, y) in widget coordinates.
    MousePress {
        /// Pointer x in widget coordinates.
        x: i32,
        /// Pointer y in widget coordinates.
        y: i32,
        /// The pressed button.
        button: MouseButton,
        /// Modifiers held during the press.
        modifiers: KeyboardModifiers,
    },
    /// A mouse button was released.
    MouseRelease {
        /// Pointer x in widget coordinates.
        x: i32,
        /// Pointer y in widget coordinates.
        y: i32,
        /// The released button.
        button: MouseButton,
        /// Modifiers held during the release.
        modifiers: KeyboardModifiers,
    },
    /// A mouse button was double-clicked.
    MouseDoubleClick {
        /// Pointer x in widget coordinates.
        x: i32,
        /// Pointer y in widget coordinates.
        y: i32,
        /// The clicked button.
        button: MouseButton,
        /// Modifiers held during the click.
        modifiers: KeyboardModifiers,
    },
    /// The pointer moved.
    MouseMove {
        /// Pointer x in widget coordinates.
        x: i32,
        /// Pointer y in widget coordinates.
        y: i32,
        /// The button held during the move, if any.
        button: MouseButton,
        /// Modifiers held during the move.
        modifiers: KeyboardModifiers,
    },
    /// The mouse wheel turned by `delta` eighths of a degree.
    Wheel {
        /// Pointer x in widget coordinates.
        x: i32,
        /// Pointer y in widget coordinates.
        y: i32,
        /// Rotation distance.
        delta: i32,
        /// Modifiers held during the turn.
        modifiers: KeyboardModifiers,
    },
    /// A key was pressed.
    KeyPress {
        /// The pressed key.
        key: Key,
        /// Modifiers held during the press.
        modifiers: KeyboardModifiers,
    },
    /// A key was released.
    KeyRelease {
        /// The released key.
        key: Key,
        /// Modifiers held during the release.
        modifiers: KeyboardModifiers,
    },
    /// The widget was resized from `old_width` × `old_height` to
    /// `width` × `height`.
    Resize {
        /// New width.
        width: i32,
        /// New height.
        height: i32,
        /// Previous width.
        old_width: i32,
        /// Previous height.
        old_height: i32,
    },
    /// The widget gained keyboard focus.
    FocusIn,
    /// The widget lost keyboard focus.
    FocusOut,
    /// The pointer entered the widget.
    Enter,
    /// The pointer left the widget.
    Leave,
    /// The widget was shown.
    Show,
    /// The widget was hidden.
    Hide,
    /// The widget was asked to close.
    Close,
}

impl WidgetEvent {
    /// The kind code of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MousePress { .. } => EventKind::MousePress,
            Self::MouseRelease { .. } => EventKind::MouseRelease,
            Self::MouseDoubleClick { .. } => EventKind::MouseDoubleClick,
            Self::MouseMove { .. } => EventKind::MouseMove,
            Self::Wheel { .. } => EventKind::Wheel,
            Self::KeyPress { .. } => EventKind::KeyPress,
            Self::KeyRelease { .. } => EventKind::KeyRelease,
            Self::Resize { .. } => EventKind::Resize,
            Self::FocusIn => EventKind::FocusIn,
            Self::FocusOut => EventKind::FocusOut,
            Self::Enter => EventKind::Enter,
            Self::Leave => EventKind::Leave,
            Self::Show => EventKind::Show,
            Self::Hide => EventKind::Hide,
            Self::Close => EventKind::Close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names() {
        assert_eq!(Key::Character('a').name(), "A");
        assert_eq!(Key::Character('7').name(), "7");
        assert_eq!(Key::Function(5).name(), "F5");
        assert_eq!(Key::PageDown.name(), "PageDown");
    }

    #[test]
    fn kind_codes_are_stable() {
        assert_eq!(EventKind::MousePress.code(), 2);
        assert_eq!(EventKind::Resize.code(), 14);
        assert_eq!(EventKind::Wheel.code(), 31);
        let event = WidgetEvent::Close;
        assert_eq!(event.kind().code(), 19);
    }
}
