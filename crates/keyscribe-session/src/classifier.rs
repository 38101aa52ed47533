//! Human/machine keystroke classification by inter-key timing.

use serde::Serialize;

use crate::types::TextEntryEndEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Human,
    /// Arrived too quickly after the previous key to have been typed by a
    /// person, e.g. a word completion typing out its suffix.
    Machine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    threshold_ms: u64,
}

impl Classifier {
    pub fn new(threshold_ms: u64) -> Self {
        Self { threshold_ms }
    }

    pub fn threshold_ms(&self) -> u64 {
        self.threshold_ms
    }

    /// The first key of a phrase is always human. A clock that moved
    /// backwards counts as zero elapsed time.
    pub fn classify(&self, last_key_time: Option<u64>, now_millis: u64) -> Pace {
        match last_key_time {
            Some(last) if now_millis.saturating_sub(last) < self.threshold_ms => Pace::Machine,
            _ => Pace::Human,
        }
    }
}

/// Keystroke savings for one finished phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypingStats {
    pub human_keypresses: u32,
    pub chars: usize,
}

impl TypingStats {
    /// `None` for aborted phrases and events without a human count.
    pub fn from_end_event(event: &TextEntryEndEvent) -> Option<Self> {
        if event.is_aborted {
            return None;
        }
        Some(Self {
            human_keypresses: event.num_human_keypresses?,
            chars: event.text.chars().count(),
        })
    }

    /// `1 - human / chars`; negative when more keys were pressed than
    /// characters produced.
    pub fn keystroke_saving_rate(&self) -> Option<f64> {
        if self.chars == 0 {
            return None;
        }
        Some(1.0 - f64::from(self.human_keypresses) / self.chars as f64)
    }
}
