//! Abbreviation derivation: finished phrase → `AbbreviationSpec`.
//!
//! Every word but the last is kept literally as a head keyword; the last
//! word is the abbreviation proper that the expansion backend fills in
//! ("a good tiaths" → keywords `a`, `good` + abbreviation `tiaths`).

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::keymap::{repeat_key, VirtualKey};
use crate::text::{remove_punctuation, strip_terminal_punctuation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationToken {
    pub value: String,
    pub is_keyword: bool,
}

impl AbbreviationToken {
    pub fn keyword(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_keyword: true,
        }
    }

    pub fn abbreviated(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_keyword: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationSpec {
    pub tokens: Vec<AbbreviationToken>,
    pub readable_string: String,
    /// Backspaces that undo the keys which typed the abbreviation.
    pub eraser_sequence: Vec<VirtualKey>,
    pub preceding_text: Option<String>,
    /// Shared by every respelling derived from the same original input.
    pub lineage_id: Uuid,
}

impl AbbreviationSpec {
    pub fn with_preceding_text(mut self, text: Option<String>) -> Self {
        self.preceding_text = text.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn eraser_length(&self) -> usize {
        self.eraser_sequence.len()
    }
}

/// Caps beyond which derivation is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbbreviationLimits {
    pub max_head_keywords: usize,
    pub max_abbreviation_length: usize,
    pub max_total_length: usize,
}

impl Default for AbbreviationLimits {
    fn default() -> Self {
        Self {
            max_head_keywords: 4,
            max_abbreviation_length: 10,
            max_total_length: 50,
        }
    }
}

/// Why a phrase yields no abbreviation. Callers treat this as "expansion
/// unavailable for this input" and offer only an abort action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationBlock {
    Empty,
    TooManyHeadKeywords { count: usize, max: usize },
    AbbreviationTooLong { len: usize, max: usize },
    PhraseTooLong { len: usize, max: usize },
}

fn split_words(phrase: &str) -> Vec<&str> {
    phrase
        .split_whitespace()
        .map(strip_terminal_punctuation)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Check the caps without building a spec.
pub fn check_limits(phrase: &str, limits: &AbbreviationLimits) -> Result<(), DerivationBlock> {
    let trimmed_len = phrase.trim().chars().count();
    let words = split_words(phrase);
    let Some(last) = words.last() else {
        return Err(DerivationBlock::Empty);
    };
    let head = words.len() - 1;
    if head > limits.max_head_keywords {
        return Err(DerivationBlock::TooManyHeadKeywords {
            count: head,
            max: limits.max_head_keywords,
        });
    }
    let last_len = last.chars().count();
    if last_len > limits.max_abbreviation_length {
        return Err(DerivationBlock::AbbreviationTooLong {
            len: last_len,
            max: limits.max_abbreviation_length,
        });
    }
    if trimmed_len > limits.max_total_length {
        return Err(DerivationBlock::PhraseTooLong {
            len: trimmed_len,
            max: limits.max_total_length,
        });
    }
    Ok(())
}

/// Number of keys in `keys` that put a character on screen; bare Shift
/// and Ctrl presses are not counted.
pub fn content_key_count(keys: &[VirtualKey]) -> usize {
    keys.iter().filter(|k| !k.is_modifier()).count()
}

/// Derive the abbreviation for a finished phrase. `keys` is the key
/// sequence that typed it and only sizes the eraser sequence.
///
/// Returns `None` when derivation is disabled for this input.
pub fn derive_abbreviation(
    phrase: &str,
    keys: &[VirtualKey],
    limits: &AbbreviationLimits,
) -> Option<AbbreviationSpec> {
    if let Err(block) = check_limits(phrase, limits) {
        debug!(?block, "abbreviation derivation disabled");
        return None;
    }
    let words = split_words(phrase);
    let (last, head) = words.split_last()?;

    let mut tokens: Vec<AbbreviationToken> = head
        .iter()
        .map(|w| AbbreviationToken::keyword(remove_punctuation(w).to_lowercase()))
        .collect();
    tokens.push(AbbreviationToken::abbreviated(last.to_lowercase()));

    let readable_string = tokens
        .iter()
        .map(|t| t.value.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    Some(AbbreviationSpec {
        tokens,
        readable_string,
        eraser_sequence: repeat_key(VirtualKey::BACKSPACE, content_key_count(keys)),
        preceding_text: None,
        lineage_id: Uuid::new_v4(),
    })
}
