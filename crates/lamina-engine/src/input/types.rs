use std::fmt;

/// Transition reported with a key or mouse button event.
///
/// `Repeat` is delivered to key callbacks only; polled state queries report
/// `Press` or `Release` (see `InputTable::key_action`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
    Release,
    Press,
    Repeat,
}

/// Physical keyboard key, independent of the active layout.
///
/// The host maps platform keycodes into these variants where possible.
/// Keys without a variant are reported as `Key::Unknown(u32)` with a stable
/// platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // Control and editing
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers as keys
    Shift,
    Control,
    Alt,
    Meta,

    // Punctuation / OEM keys
    Apostrophe,
    Backquote,
    Backslash,
    BracketLeft,
    BracketRight,
    Comma,
    Equal,
    Minus,
    Period,
    Semicolon,
    Slash,

    // Locks and system keys
    CapsLock,
    NumLock,
    ScrollLock,
    PrintScreen,
    Pause,
    Menu,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Keypad
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    NumpadAdd,
    NumpadSubtract,
    NumpadMultiply,
    NumpadDivide,
    NumpadDecimal,
    NumpadEnter,
    NumpadEqual,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,
    F13, F14, F15, F16, F17, F18,
    F19, F20, F21, F22, F23, F24,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

/// Mouse button.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Modifier keys held at event time.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Platform-agnostic window events consumed by the event router.
///
/// The host translates window system events into these. Coordinates and sizes
/// are in physical pixels with a top-left origin; the router applies the
/// bottom-left flip at its outer edge.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RawEvent {
    /// Drawable size changed.
    Resized { width: u32, height: u32 },

    Key { key: Key, action: Action },

    CursorMoved { x: f64, y: f64 },

    MouseButton { button: MouseButton, action: Action },

    /// Wheel/trackpad scroll offsets in platform scroll units.
    Scroll { x: f64, y: f64 },

    ModifiersChanged(Modifiers),

    /// Keyboard focus gained or lost.
    Focused(bool),

    /// The platform asked the window to close.
    CloseRequested,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
