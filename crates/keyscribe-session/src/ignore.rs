//! Ignore sequences: key suffixes produced by an injection mechanism that
//! must be rolled back from the reconstructed text.
//!
//! Some external keyboards type a space right after a comma. With the
//! sequence `[",", "space"]` and `ignore_from = 1` the space is removed
//! again as soon as it arrives.

use keyscribe_core::abbreviation::content_key_count;
use keyscribe_core::combo::ends_with_keys;
use keyscribe_core::keymap::VirtualKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSequenceConfig {
    keys: Vec<VirtualKey>,
    ignore_from: usize,
}

impl IgnoreSequenceConfig {
    pub fn new(keys: Vec<VirtualKey>, ignore_from: usize) -> Result<Self, IgnoreSequenceError> {
        if keys.len() <= 1 {
            return Err(IgnoreSequenceError::TooShort { len: keys.len() });
        }
        if ignore_from >= keys.len() {
            return Err(IgnoreSequenceError::IndexOutOfBounds {
                index: ignore_from,
                len: keys.len(),
            });
        }
        Ok(Self { keys, ignore_from })
    }

    pub fn keys(&self) -> &[VirtualKey] {
        &self.keys
    }

    pub fn ignore_from(&self) -> usize {
        self.ignore_from
    }

    /// Keys dropped from the history when the sequence matches.
    pub fn ignored_keys(&self) -> &[VirtualKey] {
        &self.keys[self.ignore_from..]
    }

    /// Characters dropped from the text; bare modifiers type nothing.
    pub fn ignored_chars(&self) -> usize {
        content_key_count(self.ignored_keys())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IgnoreSequenceError {
    #[error("ignore sequence needs at least 2 keys, got {len}")]
    TooShort { len: usize },
    #[error("ignore_from index {index} out of bounds for sequence of {len} keys")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("ignore sequence already registered: {0}")]
    AlreadyRegistered(String),
    #[error("ignore sequence not registered: {0}")]
    NotRegistered(String),
}

fn describe(keys: &[VirtualKey]) -> String {
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join("+")
}

#[derive(Debug, Clone, Default)]
pub struct IgnoreSequenceRegistry {
    configs: Vec<IgnoreSequenceConfig>,
}

impl IgnoreSequenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors leave the registry untouched.
    pub fn register(
        &mut self,
        keys: Vec<VirtualKey>,
        ignore_from: usize,
    ) -> Result<(), IgnoreSequenceError> {
        let config = IgnoreSequenceConfig::new(keys, ignore_from)?;
        if self.configs.iter().any(|c| c.keys == config.keys) {
            return Err(IgnoreSequenceError::AlreadyRegistered(describe(&config.keys)));
        }
        self.configs.push(config);
        Ok(())
    }

    pub fn unregister(&mut self, keys: &[VirtualKey]) -> Result<(), IgnoreSequenceError> {
        let Some(pos) = self.configs.iter().position(|c| c.keys == keys) else {
            return Err(IgnoreSequenceError::NotRegistered(describe(keys)));
        };
        self.configs.remove(pos);
        Ok(())
    }

    /// First registered sequence that ends the history.
    pub fn find_match(&self, history: &[VirtualKey]) -> Option<&IgnoreSequenceConfig> {
        self.configs.iter().find(|c| ends_with_keys(history, &c.keys))
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IgnoreSequenceConfig> {
        self.configs.iter()
    }

    pub fn clear(&mut self) {
        self.configs.clear();
    }
}
