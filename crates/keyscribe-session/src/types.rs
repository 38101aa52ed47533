use serde::Serialize;

use keyscribe_core::abbreviation::AbbreviationSpec;
use keyscribe_core::keymap::VirtualKey;

/// Which key hook a key event came from. Each source owns an independent
/// reconstruction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Keys typed into the app's own input bar.
    Internal,
    /// Keys observed system-wide by the host's keyboard hook.
    External,
}

impl Source {
    pub fn from_external(is_external: bool) -> Self {
        if is_external {
            Source::External
        } else {
            Source::Internal
        }
    }

    pub fn is_external(self) -> bool {
        self == Source::External
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEntryBeginEvent {
    pub source: Source,
    pub timestamp_millis: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEntryEndEvent {
    pub source: Source,
    pub text: String,
    pub timestamp_millis: u64,
    pub is_final: bool,
    pub is_aborted: bool,
    /// Keys typed on the user's behalf by `append_string`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injected_keys: Option<Vec<VirtualKey>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_human_keypresses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_keypresses: Option<usize>,
    /// Ask the consumer to repeat the last non-empty output.
    pub repeat_last_nonempty: bool,
}

impl TextEntryEndEvent {
    pub(crate) fn aborted(source: Source, timestamp_millis: u64) -> Self {
        Self {
            source,
            text: String::new(),
            timestamp_millis,
            is_final: true,
            is_aborted: true,
            injected_keys: None,
            num_human_keypresses: None,
            num_keypresses: None,
            repeat_last_nonempty: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputAbbreviationChangedEvent {
    pub abbreviation_spec: AbbreviationSpec,
    pub request_expansion: bool,
}

/// Everything the engine reports outward. `process_key` and the phrase
/// operations return these and push them to every registered `EventSink`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    TextEntryBegin(TextEntryBeginEvent),
    TextEntryEnd(TextEntryEndEvent),
    AbbreviationChanged(InputAbbreviationChangedEvent),
    ForegroundToggled { to_foreground: bool },
    TrackingToggled,
    /// Characters rolled back by the ignore-sequence filter.
    IgnoredSuffix { removed_chars: usize },
}

impl EngineEvent {
    pub fn as_end(&self) -> Option<&TextEntryEndEvent> {
        match self {
            EngineEvent::TextEntryEnd(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_abbreviation(&self) -> Option<&InputAbbreviationChangedEvent> {
        match self {
            EngineEvent::AbbreviationChanged(e) => Some(e),
            _ => None,
        }
    }
}
