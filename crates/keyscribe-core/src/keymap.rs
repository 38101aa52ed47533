//! Virtual key table: numeric key codes to symbolic keys and back.
//!
//! Codes follow the Windows virtual-key numbering: letters A–Z are 65–90,
//! digits 48–57, and a fixed set of named keys (editing, navigation,
//! function, modifier and OEM punctuation keys).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Symbolic identity of a key, independent of its numeric code.
///
/// Letters are always stored lowercase; case is decided by the shift state
/// at insertion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VirtualKey {
    Letter(char),
    Digit(char),
    Named(NamedKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Backspace,
    Enter,
    Space,
    End,
    Home,
    LeftArrow,
    UpArrow,
    RightArrow,
    DownArrow,
    Delete,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    LShift,
    RShift,
    LCtrl,
    RCtrl,
    Semicolon,
    Equals,
    Comma,
    Minus,
    Period,
    Slash,
    Backquote,
    OpenBracket,
    Backslash,
    CloseBracket,
    Quote,
}

impl NamedKey {
    pub const ALL: [NamedKey; 37] = [
        NamedKey::Backspace,
        NamedKey::Enter,
        NamedKey::Space,
        NamedKey::End,
        NamedKey::Home,
        NamedKey::LeftArrow,
        NamedKey::UpArrow,
        NamedKey::RightArrow,
        NamedKey::DownArrow,
        NamedKey::Delete,
        NamedKey::F1,
        NamedKey::F2,
        NamedKey::F3,
        NamedKey::F4,
        NamedKey::F5,
        NamedKey::F6,
        NamedKey::F7,
        NamedKey::F8,
        NamedKey::F9,
        NamedKey::F10,
        NamedKey::F11,
        NamedKey::F12,
        NamedKey::LShift,
        NamedKey::RShift,
        NamedKey::LCtrl,
        NamedKey::RCtrl,
        NamedKey::Semicolon,
        NamedKey::Equals,
        NamedKey::Comma,
        NamedKey::Minus,
        NamedKey::Period,
        NamedKey::Slash,
        NamedKey::Backquote,
        NamedKey::OpenBracket,
        NamedKey::Backslash,
        NamedKey::CloseBracket,
        NamedKey::Quote,
    ];

    pub fn code(self) -> u32 {
        match self {
            NamedKey::Backspace => 8,
            NamedKey::Enter => 13,
            NamedKey::Space => 32,
            NamedKey::End => 35,
            NamedKey::Home => 36,
            NamedKey::LeftArrow => 37,
            NamedKey::UpArrow => 38,
            NamedKey::RightArrow => 39,
            NamedKey::DownArrow => 40,
            NamedKey::Delete => 46,
            NamedKey::F1 => 112,
            NamedKey::F2 => 113,
            NamedKey::F3 => 114,
            NamedKey::F4 => 115,
            NamedKey::F5 => 116,
            NamedKey::F6 => 117,
            NamedKey::F7 => 118,
            NamedKey::F8 => 119,
            NamedKey::F9 => 120,
            NamedKey::F10 => 121,
            NamedKey::F11 => 122,
            NamedKey::F12 => 123,
            NamedKey::LShift => 160,
            NamedKey::RShift => 161,
            NamedKey::LCtrl => 162,
            NamedKey::RCtrl => 163,
            NamedKey::Semicolon => 186,
            NamedKey::Equals => 187,
            NamedKey::Comma => 188,
            NamedKey::Minus => 189,
            NamedKey::Period => 190,
            NamedKey::Slash => 191,
            NamedKey::Backquote => 192,
            NamedKey::OpenBracket => 219,
            NamedKey::Backslash => 220,
            NamedKey::CloseBracket => 221,
            NamedKey::Quote => 222,
        }
    }

    pub fn from_code(code: u32) -> Option<NamedKey> {
        let key = match code {
            8 => NamedKey::Backspace,
            13 => NamedKey::Enter,
            32 => NamedKey::Space,
            35 => NamedKey::End,
            36 => NamedKey::Home,
            37 => NamedKey::LeftArrow,
            38 => NamedKey::UpArrow,
            39 => NamedKey::RightArrow,
            40 => NamedKey::DownArrow,
            46 => NamedKey::Delete,
            112 => NamedKey::F1,
            113 => NamedKey::F2,
            114 => NamedKey::F3,
            115 => NamedKey::F4,
            116 => NamedKey::F5,
            117 => NamedKey::F6,
            118 => NamedKey::F7,
            119 => NamedKey::F8,
            120 => NamedKey::F9,
            121 => NamedKey::F10,
            122 => NamedKey::F11,
            123 => NamedKey::F12,
            160 => NamedKey::LShift,
            161 => NamedKey::RShift,
            162 => NamedKey::LCtrl,
            163 => NamedKey::RCtrl,
            186 => NamedKey::Semicolon,
            187 => NamedKey::Equals,
            188 => NamedKey::Comma,
            189 => NamedKey::Minus,
            190 => NamedKey::Period,
            191 => NamedKey::Slash,
            192 => NamedKey::Backquote,
            219 => NamedKey::OpenBracket,
            220 => NamedKey::Backslash,
            221 => NamedKey::CloseBracket,
            222 => NamedKey::Quote,
            _ => return None,
        };
        Some(key)
    }

    /// Stable name used in settings files and CLI input.
    pub fn name(self) -> &'static str {
        match self {
            NamedKey::Backspace => "backspace",
            NamedKey::Enter => "enter",
            NamedKey::Space => "space",
            NamedKey::End => "end",
            NamedKey::Home => "home",
            NamedKey::LeftArrow => "left",
            NamedKey::UpArrow => "up",
            NamedKey::RightArrow => "right",
            NamedKey::DownArrow => "down",
            NamedKey::Delete => "delete",
            NamedKey::F1 => "f1",
            NamedKey::F2 => "f2",
            NamedKey::F3 => "f3",
            NamedKey::F4 => "f4",
            NamedKey::F5 => "f5",
            NamedKey::F6 => "f6",
            NamedKey::F7 => "f7",
            NamedKey::F8 => "f8",
            NamedKey::F9 => "f9",
            NamedKey::F10 => "f10",
            NamedKey::F11 => "f11",
            NamedKey::F12 => "f12",
            NamedKey::LShift => "lshift",
            NamedKey::RShift => "rshift",
            NamedKey::LCtrl => "lctrl",
            NamedKey::RCtrl => "rctrl",
            NamedKey::Semicolon => ";",
            NamedKey::Equals => "=",
            NamedKey::Comma => ",",
            NamedKey::Minus => "-",
            NamedKey::Period => ".",
            NamedKey::Slash => "/",
            NamedKey::Backquote => "`",
            NamedKey::OpenBracket => "[",
            NamedKey::Backslash => "\\",
            NamedKey::CloseBracket => "]",
            NamedKey::Quote => "'",
        }
    }

    /// Character produced by a punctuation key, with and without shift.
    /// Comma and period ignore shift, matching what external keyboards
    /// report for them.
    pub fn punctuation_literal(self, shift: bool) -> Option<char> {
        let (plain, shifted) = match self {
            NamedKey::Semicolon => (';', ':'),
            NamedKey::Equals => ('=', '+'),
            NamedKey::Comma => (',', ','),
            NamedKey::Minus => ('-', '_'),
            NamedKey::Period => ('.', '.'),
            NamedKey::Slash => ('/', '?'),
            NamedKey::Backquote => ('`', '~'),
            NamedKey::OpenBracket => ('[', '{'),
            NamedKey::Backslash => ('\\', '|'),
            NamedKey::CloseBracket => (']', '}'),
            NamedKey::Quote => ('\'', '"'),
            NamedKey::Backspace
            | NamedKey::Enter
            | NamedKey::Space
            | NamedKey::End
            | NamedKey::Home
            | NamedKey::LeftArrow
            | NamedKey::UpArrow
            | NamedKey::RightArrow
            | NamedKey::DownArrow
            | NamedKey::Delete
            | NamedKey::F1
            | NamedKey::F2
            | NamedKey::F3
            | NamedKey::F4
            | NamedKey::F5
            | NamedKey::F6
            | NamedKey::F7
            | NamedKey::F8
            | NamedKey::F9
            | NamedKey::F10
            | NamedKey::F11
            | NamedKey::F12
            | NamedKey::LShift
            | NamedKey::RShift
            | NamedKey::LCtrl
            | NamedKey::RCtrl => return None,
        };
        Some(if shift { shifted } else { plain })
    }

    pub fn is_punctuation(self) -> bool {
        self.punctuation_literal(false).is_some()
    }
}

/// Character a shifted digit key produces on a US layout.
pub fn shifted_digit(digit: char) -> Option<char> {
    let c = match digit {
        '1' => '!',
        '2' => '@',
        '3' => '#',
        '4' => '$',
        '5' => '%',
        '6' => '^',
        '7' => '&',
        '8' => '*',
        '9' => '(',
        '0' => ')',
        _ => return None,
    };
    Some(c)
}

impl VirtualKey {
    pub const BACKSPACE: VirtualKey = VirtualKey::Named(NamedKey::Backspace);
    pub const ENTER: VirtualKey = VirtualKey::Named(NamedKey::Enter);
    pub const SPACE: VirtualKey = VirtualKey::Named(NamedKey::Space);
    pub const LSHIFT: VirtualKey = VirtualKey::Named(NamedKey::LShift);
    pub const LCTRL: VirtualKey = VirtualKey::Named(NamedKey::LCtrl);

    /// Resolve a numeric key code. `None` means the code is unmapped and the
    /// key must be dropped before it reaches the state machine.
    pub fn from_code(code: u32) -> Option<VirtualKey> {
        match code {
            48..=57 => char::from_u32(code).map(VirtualKey::Digit),
            65..=90 => char::from_u32(code).map(|c| VirtualKey::Letter(c.to_ascii_lowercase())),
            _ => NamedKey::from_code(code).map(VirtualKey::Named),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            VirtualKey::Letter(c) => c.to_ascii_uppercase() as u32,
            VirtualKey::Digit(c) => c as u32,
            VirtualKey::Named(named) => named.code(),
        }
    }

    pub fn is_shift(self) -> bool {
        matches!(
            self,
            VirtualKey::Named(NamedKey::LShift) | VirtualKey::Named(NamedKey::RShift)
        )
    }

    pub fn is_ctrl(self) -> bool {
        matches!(
            self,
            VirtualKey::Named(NamedKey::LCtrl) | VirtualKey::Named(NamedKey::RCtrl)
        )
    }

    /// Bare modifier presses insert nothing.
    pub fn is_modifier(self) -> bool {
        self.is_shift() || self.is_ctrl()
    }

    pub fn is_letter(self) -> bool {
        matches!(self, VirtualKey::Letter(_))
    }

    pub fn is_alphanumeric(self) -> bool {
        matches!(self, VirtualKey::Letter(_) | VirtualKey::Digit(_))
    }

    /// The character this key inserts under the given shift state, if any.
    pub fn literal(self, shift: bool) -> Option<char> {
        match self {
            VirtualKey::Letter(c) if shift => Some(c.to_ascii_uppercase()),
            VirtualKey::Letter(c) => Some(c),
            VirtualKey::Digit(d) if shift => shifted_digit(d),
            VirtualKey::Digit(d) => Some(d),
            VirtualKey::Named(NamedKey::Space) => Some(' '),
            VirtualKey::Named(NamedKey::Enter) => Some('\n'),
            VirtualKey::Named(named) => named.punctuation_literal(shift),
        }
    }
}

/// Keys that type `ch` on a US layout: a single key, or a left shift
/// followed by the key for characters that need it (`'!'` → LShift, `1`).
/// Uppercase letters map to the bare letter key.
pub fn keys_for_char(ch: char) -> Option<Vec<VirtualKey>> {
    if ch.is_ascii_alphabetic() {
        return Some(vec![VirtualKey::Letter(ch.to_ascii_lowercase())]);
    }
    if ch.is_ascii_digit() {
        return Some(vec![VirtualKey::Digit(ch)]);
    }
    match ch {
        ' ' => return Some(vec![VirtualKey::SPACE]),
        '\n' => return Some(vec![VirtualKey::ENTER]),
        _ => {}
    }
    for named in NamedKey::ALL {
        if named.punctuation_literal(false) == Some(ch) {
            return Some(vec![VirtualKey::Named(named)]);
        }
    }
    for named in NamedKey::ALL {
        if named.punctuation_literal(true) == Some(ch) {
            return Some(vec![VirtualKey::LSHIFT, VirtualKey::Named(named)]);
        }
    }
    ('0'..='9')
        .find(|&d| shifted_digit(d) == Some(ch))
        .map(|d| vec![VirtualKey::LSHIFT, VirtualKey::Digit(d)])
}

/// Numeric codes that type `ch`; see [`keys_for_char`].
pub fn codes_for_char(ch: char) -> Option<Vec<u32>> {
    keys_for_char(ch).map(|keys| keys.into_iter().map(VirtualKey::code).collect())
}

pub fn repeat_key(key: VirtualKey, count: usize) -> Vec<VirtualKey> {
    vec![key; count]
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("unknown key name: {0:?}")]
    Unknown(String),
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VirtualKey::Letter(c) | VirtualKey::Digit(c) => write!(f, "{c}"),
            VirtualKey::Named(named) => f.write_str(named.name()),
        }
    }
}

impl FromStr for VirtualKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphabetic() {
                return Ok(VirtualKey::Letter(c.to_ascii_lowercase()));
            }
            if c.is_ascii_digit() {
                return Ok(VirtualKey::Digit(c));
            }
        }
        let lower = s.to_ascii_lowercase();
        NamedKey::ALL
            .into_iter()
            .find(|named| named.name() == lower)
            .map(VirtualKey::Named)
            .ok_or_else(|| KeyParseError::Unknown(s.to_string()))
    }
}

impl TryFrom<String> for VirtualKey {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VirtualKey> for String {
    fn from(key: VirtualKey) -> Self {
        key.to_string()
    }
}
