//! Spelling refinement: the user spells out one token of an abbreviation
//! and a new `AbbreviationSpec` of the same lineage is produced.
//!
//! ```text
//! ChoosingToken --letter matching one token / choose_token--> SpellingToken
//! SpellingToken --Space | Enter--> Done (emits the refined spec)
//! Done --letter matching one token / choose_token--> SpellingToken
//! ```

use tracing::debug;
use uuid::Uuid;

use keyscribe_core::abbreviation::{AbbreviationSpec, AbbreviationToken};
use keyscribe_core::keymap::{repeat_key, VirtualKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellingPhase {
    ChoosingToken,
    /// `base_len` is the byte length of the reconstructed text before the
    /// first spelled letter; the spelled word is everything after it.
    SpellingToken { index: usize, base_len: usize },
    Done,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SpellingError {
    #[error("no spelling session is active")]
    NoSession,
    #[error("token index {index} out of bounds for {len} tokens")]
    TokenIndexOutOfBounds { index: usize, len: usize },
}

#[derive(Debug, Clone)]
pub struct SpellingSession {
    /// Tokens as they were when the lineage started.
    original: Vec<AbbreviationToken>,
    spelled: Vec<Option<String>>,
    /// Most recent spec of the lineage; its eraser is extended each round.
    latest: AbbreviationSpec,
    phase: SpellingPhase,
    input: String,
}

impl SpellingSession {
    pub fn new(spec: AbbreviationSpec) -> Self {
        Self {
            original: spec.tokens.clone(),
            spelled: vec![None; spec.tokens.len()],
            latest: spec,
            phase: SpellingPhase::ChoosingToken,
            input: String::new(),
        }
    }

    /// Start from `spec` with every non-keyword token split into one token
    /// per letter, so each letter can be spelled out as its own word.
    pub fn with_letter_tokens(mut spec: AbbreviationSpec) -> Self {
        spec.tokens = spec
            .tokens
            .into_iter()
            .flat_map(|t| {
                if t.is_keyword {
                    vec![t]
                } else {
                    t.value
                        .chars()
                        .map(|c| AbbreviationToken::abbreviated(c.to_string()))
                        .collect()
                }
            })
            .collect();
        spec.readable_string = join_tokens(&spec.tokens);
        Self::new(spec)
    }

    pub fn phase(&self) -> SpellingPhase {
        self.phase
    }

    pub fn is_spelling(&self) -> bool {
        matches!(self.phase, SpellingPhase::SpellingToken { .. })
    }

    pub fn lineage_id(&self) -> Uuid {
        self.latest.lineage_id
    }

    pub fn latest_spec(&self) -> &AbbreviationSpec {
        &self.latest
    }

    /// Word typed so far for the token being spelled.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Current value of every token: the spelled word where there is one,
    /// otherwise the original.
    pub fn display_tokens(&self) -> Vec<&str> {
        self.original
            .iter()
            .zip(&self.spelled)
            .map(|(token, spelled)| spelled.as_deref().unwrap_or(&token.value))
            .collect()
    }

    /// Start spelling `index`; letters typed after this point form the word.
    pub fn choose_token(&mut self, index: usize, text: &str) -> Result<(), SpellingError> {
        if index >= self.original.len() {
            return Err(SpellingError::TokenIndexOutOfBounds {
                index,
                len: self.original.len(),
            });
        }
        self.phase = SpellingPhase::SpellingToken {
            index,
            base_len: text.len(),
        };
        self.input.clear();
        Ok(())
    }

    /// Feed one key after the reconstructed text has been updated. Returns
    /// the refined spec when a round completes.
    pub fn on_keypress(&mut self, key: VirtualKey, text: &str) -> Option<AbbreviationSpec> {
        match self.phase {
            SpellingPhase::ChoosingToken | SpellingPhase::Done => {
                if let VirtualKey::Letter(c) = key {
                    self.select_by_letter(c, text);
                }
                None
            }
            SpellingPhase::SpellingToken { base_len, .. } => {
                if key == VirtualKey::SPACE || key == VirtualKey::ENTER {
                    return self.finish();
                }
                self.input = text.get(base_len..).unwrap_or_default().to_string();
                None
            }
        }
    }

    /// End the current round early (e.g. a "done" button). A round with no
    /// word typed yet keeps spelling the same token and yields nothing.
    pub fn finish(&mut self) -> Option<AbbreviationSpec> {
        let SpellingPhase::SpellingToken { index, .. } = self.phase else {
            return None;
        };
        let word = spelled_word(&self.input);
        if word.is_empty() {
            debug!(index, "nothing spelled yet");
            return None;
        }
        let raw = std::mem::take(&mut self.input);
        debug!(index, %word, "spelled token");
        self.spelled[index] = Some(word);

        let tokens: Vec<AbbreviationToken> = self
            .original
            .iter()
            .zip(&self.spelled)
            .map(|(token, spelled)| match spelled {
                Some(word) => AbbreviationToken::keyword(word.clone()),
                None => token.clone(),
            })
            .collect();
        let mut eraser_sequence = self.latest.eraser_sequence.clone();
        eraser_sequence.extend(repeat_key(VirtualKey::BACKSPACE, raw.chars().count() + 1));

        let spec = AbbreviationSpec {
            readable_string: join_tokens(&tokens),
            tokens,
            eraser_sequence,
            preceding_text: self.latest.preceding_text.clone(),
            lineage_id: self.latest.lineage_id,
        };
        self.latest = spec.clone();
        self.phase = SpellingPhase::Done;
        Some(spec)
    }

    fn select_by_letter(&mut self, letter: char, text: &str) {
        let letter = letter.to_string();
        let mut matching = self
            .latest
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.value.to_lowercase() == letter)
            .map(|(i, _)| i);
        let (Some(index), None) = (matching.next(), matching.next()) else {
            return;
        };
        let base_len = text.char_indices().next_back().map_or(0, |(i, _)| i);
        self.phase = SpellingPhase::SpellingToken { index, base_len };
        self.input = text[base_len..].to_string();
    }
}

fn join_tokens(tokens: &[AbbreviationToken]) -> String {
    tokens
        .iter()
        .map(|t| t.value.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased word with surrounding blanks, leading punctuation and one
/// trailing punctuation mark removed.
fn spelled_word(raw: &str) -> String {
    let word = raw
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    strip_one_punctuation(word).trim_end().to_lowercase()
}

fn strip_one_punctuation(word: &str) -> &str {
    match word.chars().next_back() {
        Some(c) if c.is_ascii_punctuation() => &word[..word.len() - c.len_utf8()],
        _ => word,
    }
}
