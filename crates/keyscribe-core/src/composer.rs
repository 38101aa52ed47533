//! Multi-key composer: a trailing run of two or more keys that produces a
//! single character (Shift + `/` → `?`).

use crate::combo::{ends_with, KeyPattern};
use crate::keymap::{NamedKey, VirtualKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiKeyChar {
    pub keys: Vec<KeyPattern>,
    pub ch: char,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("multi-key sequence needs at least two keys, got {len}")]
    TooShort { len: usize },
    #[error("multi-key sequence {keys} already composes {existing:?}")]
    Duplicate { keys: String, existing: char },
}

#[derive(Debug, Clone, Default)]
pub struct Composer {
    /// Sorted longest-first so the most specific sequence wins.
    entries: Vec<MultiKeyChar>,
}

impl Composer {
    /// Shift + digit and Shift + punctuation for every key whose shifted
    /// character differs from its plain one.
    pub fn standard() -> Self {
        let mut composer = Self::default();
        for d in '0'..='9' {
            let key = VirtualKey::Digit(d);
            if let (Some(plain), Some(shifted)) = (key.literal(false), key.literal(true)) {
                if plain != shifted {
                    composer.insert(vec![KeyPattern::AnyShift, key.into()], shifted);
                }
            }
        }
        for named in NamedKey::ALL {
            if let (Some(plain), Some(shifted)) = (
                named.punctuation_literal(false),
                named.punctuation_literal(true),
            ) {
                if plain != shifted {
                    composer.insert(
                        vec![KeyPattern::AnyShift, VirtualKey::Named(named).into()],
                        shifted,
                    );
                }
            }
        }
        composer
    }

    /// Register a sequence of at least two keys. A rejected sequence leaves
    /// the composer untouched.
    pub fn register(&mut self, keys: Vec<KeyPattern>, ch: char) -> Result<(), ComposeError> {
        if keys.len() < 2 {
            return Err(ComposeError::TooShort { len: keys.len() });
        }
        if let Some(existing) = self.entries.iter().find(|e| e.keys == keys) {
            let keys = keys
                .iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join("+");
            return Err(ComposeError::Duplicate {
                keys,
                existing: existing.ch,
            });
        }
        self.insert(keys, ch);
        Ok(())
    }

    fn insert(&mut self, keys: Vec<KeyPattern>, ch: char) {
        self.entries.push(MultiKeyChar { keys, ch });
        self.entries.sort_by(|a, b| b.keys.len().cmp(&a.keys.len()));
    }

    /// Character composed by the tail of `history`, if any.
    pub fn compose(&self, history: &[VirtualKey]) -> Option<char> {
        self.entries
            .iter()
            .find(|e| ends_with(history, &e.keys))
            .map(|e| e.ch)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
