use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::KeyParseError;

/// Normalized key identifier. Names follow the browser `KeyboardEvent.key`
/// convention so bindings read the same in config files and help sheets.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// Reported by input methods that only deliver a numeric code.
    Unidentified,
}

pub const SPACE: Key = Key::Char(' ');

/// Numeric codes some keyboards and input methods report in place of a key
/// name. Only consulted when the key name itself has no binding.
pub const LEGACY_KEY_CODES: &[(u32, char)] = &[
    (49, '1'),
    (50, '2'),
    (51, '3'),
    (52, '4'),
    (53, '5'),
    (54, '6'),
    (76, 'l'),
];

pub fn legacy_key(code: u32) -> Option<Key> {
    LEGACY_KEY_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, ch)| Key::Char(ch))
}

/// The numeric code a browser would report for a printable key.
fn legacy_code_for(ch: char) -> Option<u32> {
    if ch.is_ascii_alphanumeric() {
        Some(ch.to_ascii_uppercase() as u32)
    } else {
        None
    }
}

impl Key {
    pub fn digit(&self) -> Option<u32> {
        match self {
            Key::Char(ch) => ch.to_digit(10),
            _ => None,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Key::Char(ch) => ch.to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Tab => "Tab".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Delete => "Delete".to_string(),
            Key::Up => "ArrowUp".to_string(),
            Key::Down => "ArrowDown".to_string(),
            Key::Left => "ArrowLeft".to_string(),
            Key::Right => "ArrowRight".to_string(),
            Key::Home => "Home".to_string(),
            Key::End => "End".to_string(),
            Key::PageUp => "PageUp".to_string(),
            Key::PageDown => "PageDown".to_string(),
            Key::Unidentified => "Unidentified".to_string(),
        }
    }

    /// Short label used in help sheets.
    pub fn label(&self) -> String {
        match self {
            Key::Char(' ') => "Space".to_string(),
            Key::Escape => "ESC".to_string(),
            Key::Up => "↑".to_string(),
            Key::Down => "↓".to_string(),
            Key::Left => "←".to_string(),
            Key::Right => "→".to_string(),
            other => other.name(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "" => return Err(KeyParseError::Empty),
            " " | "Space" | "Spacebar" => SPACE,
            "Enter" | "Return" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            "Backspace" => Key::Backspace,
            "Delete" | "Del" => Key::Delete,
            "ArrowUp" | "Up" => Key::Up,
            "ArrowDown" | "Down" => Key::Down,
            "ArrowLeft" | "Left" => Key::Left,
            "ArrowRight" | "Right" => Key::Right,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "Unidentified" | "Process" => Key::Unidentified,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Key::Char(ch),
                    _ => return Err(KeyParseError::Unknown(other.to_string())),
                }
            }
        };
        Ok(key)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One captured key-down event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// Legacy numeric key code, when the source reports one.
    pub code: Option<u32>,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        let code = match &key {
            Key::Char(ch) => legacy_code_for(*ch),
            _ => None,
        };
        Self {
            key,
            code,
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    pub fn ch(ch: char) -> Self {
        Self::new(Key::Char(ch))
    }

    /// A press that only carries a numeric code, as some input methods send.
    pub fn code_only(code: u32) -> Self {
        Self {
            key: Key::Unidentified,
            code: Some(code),
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

impl From<KeyEvent> for KeyPress {
    fn from(event: KeyEvent) -> Self {
        let shift = event.modifiers.contains(KeyModifiers::SHIFT);
        let key = match event.code {
            KeyCode::Char(ch) => Key::Char(ch),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab | KeyCode::BackTab => Key::Tab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            _ => Key::Unidentified,
        };
        let mut press = KeyPress::new(key);
        press.shift = shift || event.code == KeyCode::BackTab;
        press.ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        press.alt = event.modifiers.contains(KeyModifiers::ALT);
        press
    }
}
