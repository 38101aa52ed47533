//! Combo sequences: fixed key sequences whose trailing match in the key
//! history triggers an action instead of (or in addition to) insertion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::keymap::{KeyParseError, VirtualKey};

/// One position in a combo sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeyPattern {
    Key(VirtualKey),
    /// Either shift key.
    AnyShift,
    /// Either ctrl key.
    AnyCtrl,
}

impl KeyPattern {
    pub fn matches(self, key: VirtualKey) -> bool {
        match self {
            KeyPattern::Key(k) => k == key,
            KeyPattern::AnyShift => key.is_shift(),
            KeyPattern::AnyCtrl => key.is_ctrl(),
        }
    }
}

impl From<VirtualKey> for KeyPattern {
    fn from(key: VirtualKey) -> Self {
        KeyPattern::Key(key)
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPattern::Key(k) => write!(f, "{k}"),
            KeyPattern::AnyShift => f.write_str("shift"),
            KeyPattern::AnyCtrl => f.write_str("ctrl"),
        }
    }
}

impl FromStr for KeyPattern {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shift" => Ok(KeyPattern::AnyShift),
            "ctrl" => Ok(KeyPattern::AnyCtrl),
            _ => s.parse().map(KeyPattern::Key),
        }
    }
}

impl TryFrom<String> for KeyPattern {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyPattern> for String {
    fn from(pattern: KeyPattern) -> Self {
        pattern.to_string()
    }
}

/// Whether `history` ends with `pattern`.
pub fn ends_with(history: &[VirtualKey], pattern: &[KeyPattern]) -> bool {
    if pattern.is_empty() || history.len() < pattern.len() {
        return false;
    }
    let tail = &history[history.len() - pattern.len()..];
    tail.iter().zip(pattern).all(|(&k, p)| p.matches(k))
}

/// Whether `history` ends with exactly `keys`.
pub fn ends_with_keys(history: &[VirtualKey], keys: &[VirtualKey]) -> bool {
    !keys.is_empty() && history.ends_with(keys)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboAction {
    ToggleForeground,
    ToggleTracking,
    WordBackspace,
    SentenceEnd,
    PhraseEnd,
    AbbreviationTrigger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboConfig {
    keys: Vec<KeyPattern>,
    action: ComboAction,
}

impl ComboConfig {
    pub fn new(action: ComboAction, keys: Vec<KeyPattern>) -> Result<Self, ComboError> {
        if keys.is_empty() {
            return Err(ComboError::Empty(action));
        }
        Ok(Self { keys, action })
    }

    pub fn keys(&self) -> &[KeyPattern] {
        &self.keys
    }

    pub fn action(&self) -> ComboAction {
        self.action
    }

    pub fn matches_tail(&self, history: &[VirtualKey]) -> bool {
        ends_with(history, &self.keys)
    }

    /// Whether `history` ends with every key of this combo but the last,
    /// i.e. the next key could complete it.
    pub fn matches_pending_tail(&self, history: &[VirtualKey]) -> bool {
        self.keys.len() > 1 && ends_with(history, &self.keys[..self.keys.len() - 1])
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ComboError {
    #[error("combo for {0:?} has no keys")]
    Empty(ComboAction),
    #[error("combo for {action:?} is already registered: {keys}")]
    Duplicate { action: ComboAction, keys: String },
}

/// Ordered set of combos; earlier registrations win ties.
#[derive(Debug, Clone, Default)]
pub struct ComboRegistry {
    combos: Vec<ComboConfig>,
}

impl ComboRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a combo. Re-registering an identical sequence is an error and
    /// leaves the registry untouched.
    pub fn register(&mut self, combo: ComboConfig) -> Result<(), ComboError> {
        if self.combos.iter().any(|c| c.keys == combo.keys) {
            let keys = combo
                .keys
                .iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join("+");
            return Err(ComboError::Duplicate {
                action: combo.action,
                keys,
            });
        }
        self.combos.push(combo);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComboConfig> {
        self.combos.iter()
    }

    /// First combo among `actions` whose sequence ends the history.
    pub fn first_match(
        &self,
        history: &[VirtualKey],
        actions: &[ComboAction],
    ) -> Option<&ComboConfig> {
        self.combos
            .iter()
            .find(|c| actions.contains(&c.action) && c.matches_tail(history))
    }

    pub fn matches(&self, action: ComboAction, history: &[VirtualKey]) -> bool {
        self.first_match(history, &[action]).is_some()
    }

    /// Longest sequence registered for `action` that ends the history.
    pub fn longest_match(&self, action: ComboAction, history: &[VirtualKey]) -> Option<usize> {
        self.combos
            .iter()
            .filter(|c| c.action == action && c.matches_tail(history))
            .map(|c| c.keys.len())
            .max()
    }

    pub fn pending(&self, action: ComboAction, history: &[VirtualKey]) -> bool {
        self.combos
            .iter()
            .any(|c| c.action == action && c.matches_pending_tail(history))
    }
}
