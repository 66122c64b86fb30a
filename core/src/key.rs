//! Key events as delivered by the host.
//!
//! Hosts decode their own key symbols; `Key::from_keysym` covers the X11
//! keysym values the router cares about and maps everything else to
//! `Key::Other`.

pub mod keysym {
    pub const SPACE: u32 = 0x0020;
    pub const BACKSPACE: u32 = 0xff08;
    pub const TAB: u32 = 0xff09;
    pub const RETURN: u32 = 0xff0d;
    pub const ESCAPE: u32 = 0xff1b;
    pub const KP_ENTER: u32 = 0xff8d;
    pub const SHIFT_L: u32 = 0xffe1;
    pub const SHIFT_R: u32 = 0xffe2;
}

bitflags::bitflags! {
    /// Modifier state at the time of the event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u32 {
        const SHIFT = 1 << 0;
        const CAPS_LOCK = 1 << 1;
        const CTRL = 1 << 2;
        const ALT = 1 << 3;
        const NUM_LOCK = 1 << 4;
        const SUPER = 1 << 6;
    }
}

impl Modifiers {
    /// Ctrl, Alt or Super: the key is a shortcut, not text.
    pub fn has_command_modifier(&self) -> bool {
        self.intersects(Self::CTRL | Self::ALT | Self::SUPER)
    }
}

/// Key classes the router distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Printable ASCII other than space (0x21..=0x7E)
    Char(char),
    Space,
    Return,
    KeypadEnter,
    Escape,
    BackSpace,
    ShiftLeft,
    ShiftRight,
    /// Any other keysym
    Other(u32),
}

impl Key {
    /// Classify an X11 keysym.
    pub fn from_keysym(sym: u32) -> Self {
        match sym {
            keysym::SPACE => Self::Space,
            0x21..=0x7e => Self::Char(char::from(sym as u8)),
            keysym::RETURN => Self::Return,
            keysym::KP_ENTER => Self::KeypadEnter,
            keysym::ESCAPE => Self::Escape,
            keysym::BACKSPACE => Self::BackSpace,
            keysym::SHIFT_L => Self::ShiftLeft,
            keysym::SHIFT_R => Self::ShiftRight,
            other => Self::Other(other),
        }
    }

    /// The text character this key types, if it is printable ASCII.
    pub fn text_char(&self) -> Option<char> {
        match *self {
            Self::Char(ch) if ch.is_ascii_graphic() => Some(ch),
            Self::Space => Some(' '),
            _ => None,
        }
    }
}

impl From<char> for Key {
    fn from(ch: char) -> Self {
        if ch == ' ' {
            Self::Space
        } else {
            Self::Char(ch)
        }
    }
}

/// One key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub is_release: bool,
}

impl KeyEvent {
    pub fn press(key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::empty(),
            is_release: false,
        }
    }

    pub fn release(key: impl Into<Key>) -> Self {
        Self {
            is_release: true,
            ..Self::press(key)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::press(key)
    }
}
