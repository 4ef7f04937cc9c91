//! Key-combination labels and the local keyboard fallback

use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

use crate::state::Trigger;

/// A modifier chord ending in a single letter, e.g. `Ctrl+Shift+Q`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    pub key: char,
}

impl FromStr for KeyChord {
    type Err = String;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let mut chord = KeyChord {
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
            key: ' ',
        };
        let mut key = None;

        for part in label.split('+').map(str::trim) {
            match part.to_uppercase().as_str() {
                "CTRL" => chord.ctrl = true,
                "SHIFT" => chord.shift = true,
                "ALT" => chord.alt = true,
                "WIN" | "META" | "SUPER" => chord.meta = true,
                k if k.len() == 1 && k.chars().all(|c| c.is_ascii_alphabetic()) => {
                    if key.is_some() {
                        return Err(format!("Shortcut '{}' has more than one key", label));
                    }
                    key = k.chars().next();
                }
                _ => return Err(format!("Unrecognised shortcut part '{}' in '{}'", part, label)),
            }
        }

        chord.key = key.ok_or_else(|| format!("Shortcut '{}' has no letter key", label))?;
        Ok(chord)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        if self.meta {
            write!(f, "Super+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Normalise a shortcut label to its canonical spelling
pub fn normalize_shortcut(label: &str) -> Result<String, String> {
    label.parse::<KeyChord>().map(|chord| chord.to_string())
}

/// A key press forwarded by the presentation layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyPress {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
    pub key: String,
}

impl KeyPress {
    fn letter(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
            _ => None,
        }
    }
}

/// Map a local key press onto a trigger.
///
/// The fallback chords are fixed (`Ctrl+Alt+P` and `Ctrl+Alt+Q`) and do not follow
/// the configured global shortcut labels. Shift and meta are not inspected.
pub fn fallback_trigger(press: &KeyPress) -> Option<Trigger> {
    if !(press.ctrl && press.alt) {
        return None;
    }

    match press.letter() {
        Some('P') => Some(Trigger::TogglePause),
        Some('Q') => Some(Trigger::Skip),
        _ => None,
    }
}
