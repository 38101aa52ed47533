use tracing::debug;

use keyscribe_core::keymap::{keys_for_char, VirtualKey};
use keyscribe_core::text::{finalize_text, has_content};

use super::types::{EngineEvent, Source, TextEntryBeginEvent, TextEntryEndEvent};
use super::{now_millis, KeystrokeEngine};

impl KeystrokeEngine {
    /// End the current phrase of `source`: emits an end event if the text
    /// has content, and always resets the state.
    pub fn finalize_phrase(&mut self, source: Source) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        self.finalize_into(source, now_millis(), &mut events);
        self.emit(events)
    }

    pub(crate) fn finalize_into(
        &mut self,
        source: Source,
        now_millis: u64,
        events: &mut Vec<EngineEvent>,
    ) {
        let state = self.state_mut(source);
        let text = finalize_text(&state.text);
        if has_content(&text) {
            debug!(?source, %text, human = state.human_keypress_count, "phrase finalized");
            let injected_keys =
                (!state.injected_keys.is_empty()).then(|| state.injected_keys.clone());
            events.push(EngineEvent::TextEntryEnd(TextEntryEndEvent {
                source,
                text,
                timestamp_millis: now_millis,
                is_final: true,
                is_aborted: false,
                injected_keys,
                num_human_keypresses: Some(state.human_keypress_count),
                num_keypresses: Some(state.key_history.len()),
                repeat_last_nonempty: false,
            }));
        } else {
            debug!(?source, "phrase discarded");
        }
        state.reset();
    }

    /// Drop the current phrase of `source` and report it as aborted.
    pub fn abort(&mut self, source: Source) -> Vec<EngineEvent> {
        debug!(?source, "phrase aborted");
        self.state_mut(source).reset();
        self.emit(vec![EngineEvent::TextEntryEnd(TextEntryEndEvent::aborted(
            source,
            now_millis(),
        ))])
    }

    /// Finalize as typed. With nothing typed, ask the consumer to repeat
    /// its last non-empty output instead.
    pub fn speak_as_is(&mut self, source: Source) -> Vec<EngineEvent> {
        let now = now_millis();
        let mut events = Vec::new();
        if has_content(self.state(source).text()) {
            self.finalize_into(source, now, &mut events);
        } else {
            self.state_mut(source).reset();
            events.push(EngineEvent::TextEntryEnd(TextEntryEndEvent {
                repeat_last_nonempty: true,
                is_aborted: false,
                ..TextEntryEndEvent::aborted(source, now)
            }));
        }
        self.emit(events)
    }

    /// Insert `text` at the cursor as if typed, e.g. a chosen expansion.
    /// The keys that would type it are recorded as injected keys.
    pub fn append_string(
        &mut self,
        text: &str,
        source: Source,
        ensure_ends_in_space: bool,
    ) -> Vec<EngineEvent> {
        let now = now_millis();
        let mut appended = text.to_string();
        if ensure_ends_in_space && !appended.is_empty() && !appended.ends_with(char::is_whitespace)
        {
            appended.push(' ');
        }
        let keys: Vec<VirtualKey> = appended.chars().filter_map(keys_for_char).flatten().collect();

        let was_empty = self.state(source).is_empty();
        let state = self.state_mut(source);
        state.insert_str(&appended);
        state.key_history.extend_from_slice(&keys);
        state.injected_keys.extend(keys);
        state.shift_active = false;

        let mut events = Vec::new();
        if was_empty && !state.is_empty() {
            events.push(EngineEvent::TextEntryBegin(TextEntryBeginEvent {
                source,
                timestamp_millis: now,
            }));
        }
        if !source.is_external() {
            self.ctx
                .keypress_listeners()
                .notify(self.internal.key_history(), self.internal.text());
        }
        self.emit(events)
    }
}
