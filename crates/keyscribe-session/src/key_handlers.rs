use tracing::{debug, debug_span, trace};

use keyscribe_core::combo::ComboAction;
use keyscribe_core::keymap::{NamedKey, VirtualKey};

use super::classifier::Pace;
use super::types::{EngineEvent, Source, TextEntryBeginEvent};
use super::{now_millis, KeystrokeEngine};

impl KeystrokeEngine {
    /// Process one key event stamped with the current wall-clock time.
    pub fn process_key(&mut self, code: u32, is_external: bool) -> Vec<EngineEvent> {
        self.process_key_at(code, is_external, now_millis())
    }

    /// Process one key event. Unmapped codes are dropped without touching
    /// any state. Returns the events produced, which have also been pushed
    /// to every registered `EventSink`.
    pub fn process_key_at(
        &mut self,
        code: u32,
        is_external: bool,
        now_millis: u64,
    ) -> Vec<EngineEvent> {
        let source = Source::from_external(is_external);
        let _span = debug_span!("process_key", code, ?source).entered();

        let Some(key) = VirtualKey::from_code(code) else {
            trace!(code, "unmapped key code");
            return Vec::new();
        };
        let mut events = Vec::new();
        self.apply_key(source, key, now_millis, &mut events);
        self.emit(events)
    }

    fn apply_key(
        &mut self,
        source: Source,
        key: VirtualKey,
        now_millis: u64,
        events: &mut Vec<EngineEvent>,
    ) {
        let was_empty = self.state(source).is_empty();
        self.record_key(source, key, now_millis);

        if self.handle_hotkey(source, key, events) {
            return;
        }

        if source.is_external()
            && self
                .ctx
                .combos()
                .matches(ComboAction::PhraseEnd, self.state(source).key_history())
        {
            debug!("phrase-end combo");
            self.finalize_into(source, now_millis, events);
            return;
        }

        self.edit_buffer(source, key);

        if source.is_external()
            && self
                .ctx
                .combos()
                .matches(ComboAction::SentenceEnd, self.state(source).key_history())
        {
            debug!("sentence-end combo");
            self.finalize_into(source, now_millis, events);
            return;
        }

        if was_empty && !self.state(source).is_empty() {
            events.push(EngineEvent::TextEntryBegin(TextEntryBeginEvent {
                source,
                timestamp_millis: now_millis,
            }));
        }

        if !source.is_external() {
            self.apply_ignore_filter(source, events);
        }

        self.maybe_trigger_abbreviation(source, events);

        if !source.is_external() {
            self.ctx
                .keypress_listeners()
                .notify(self.internal.key_history(), self.internal.text());
            self.feed_spelling(key, events);
        }
    }

    fn record_key(&mut self, source: Source, key: VirtualKey, now_millis: u64) {
        let pace = self
            .ctx
            .classifier()
            .classify(self.state(source).last_key_time, now_millis);
        trace!(%key, ?pace, "key recorded");
        let state = self.state_mut(source);
        state.key_history.push(key);
        state.last_key_time = Some(now_millis);
        if pace == Pace::Human {
            state.human_keypress_count += 1;
        }
    }

    /// Foreground and tracking toggles. Returns true when the key completed
    /// one; the buffer is left untouched.
    fn handle_hotkey(
        &mut self,
        source: Source,
        key: VirtualKey,
        events: &mut Vec<EngineEvent>,
    ) -> bool {
        let action = match self.ctx.combos().first_match(
            self.state(source).key_history(),
            &[ComboAction::ToggleForeground, ComboAction::ToggleTracking],
        ) {
            Some(combo) => combo.action(),
            None => return false,
        };
        if !key.is_shift() {
            self.state_mut(source).shift_active = false;
        }

        match action {
            ComboAction::ToggleForeground => {
                self.foreground = !self.foreground;
                debug!(to_foreground = self.foreground, "foreground toggle");
                if let Some(callback) = self.ctx.foreground_callback() {
                    callback(self.foreground);
                }
                events.push(EngineEvent::ForegroundToggled {
                    to_foreground: self.foreground,
                });
            }
            ComboAction::ToggleTracking => {
                debug!("tracking toggle");
                if let Some(callback) = self.ctx.tracking_callback() {
                    callback();
                }
                events.push(EngineEvent::TrackingToggled);
            }
            _ => {}
        }
        true
    }

    /// Word-delete when the word-backspace combo matches, or, failing
    /// that, when the key right before the backspace is a Ctrl.
    fn word_backspace_requested(&self, source: Source) -> bool {
        let history = self.state(source).key_history();
        if self.ctx.combos().matches(ComboAction::WordBackspace, history) {
            return true;
        }
        history.len() >= 2 && history[history.len() - 2].is_ctrl()
    }

    fn edit_buffer(&mut self, source: Source, key: VirtualKey) {
        let history = self.state(source).key_history();
        let composed = self.ctx.composer().compose(history);
        let word_backspace = key == VirtualKey::BACKSPACE && self.word_backspace_requested(source);
        // The left arrow of Ctrl+Shift+Left belongs to the word-backspace combo.
        let left_consumed = key == VirtualKey::Named(NamedKey::LeftArrow)
            && self.ctx.combos().pending(ComboAction::WordBackspace, history);

        let state = self.state_mut(source);
        if let Some(c) = composed {
            state.insert_char(c);
            state.shift_active = false;
            return;
        }

        match key {
            VirtualKey::Letter(_) | VirtualKey::Digit(_) => {
                if let Some(c) = key.literal(state.shift_active) {
                    state.insert_char(c);
                }
            }
            VirtualKey::Named(named) => match named {
                NamedKey::Space => state.insert_char(' '),
                NamedKey::Enter => state.insert_char('\n'),
                NamedKey::Home => state.move_home(),
                NamedKey::End => state.move_end(),
                NamedKey::LeftArrow => {
                    if !left_consumed {
                        state.move_left();
                    }
                }
                NamedKey::RightArrow => state.move_right(),
                NamedKey::Backspace => {
                    if word_backspace {
                        state.delete_word_before();
                    } else {
                        state.delete_before();
                    }
                }
                NamedKey::Delete => state.delete_after(),
                NamedKey::LShift | NamedKey::RShift => {
                    state.shift_active = true;
                    return;
                }
                NamedKey::Semicolon
                | NamedKey::Equals
                | NamedKey::Comma
                | NamedKey::Minus
                | NamedKey::Period
                | NamedKey::Slash
                | NamedKey::Backquote
                | NamedKey::OpenBracket
                | NamedKey::Backslash
                | NamedKey::CloseBracket
                | NamedKey::Quote => {
                    if let Some(c) = named.punctuation_literal(state.shift_active) {
                        state.insert_char(c);
                    }
                }
                NamedKey::LCtrl
                | NamedKey::RCtrl
                | NamedKey::UpArrow
                | NamedKey::DownArrow
                | NamedKey::F1
                | NamedKey::F2
                | NamedKey::F3
                | NamedKey::F4
                | NamedKey::F5
                | NamedKey::F6
                | NamedKey::F7
                | NamedKey::F8
                | NamedKey::F9
                | NamedKey::F10
                | NamedKey::F11
                | NamedKey::F12 => {}
            },
        }
        state.shift_active = false;
    }

    /// Roll back the ignored suffix of a matching ignore sequence.
    fn apply_ignore_filter(&mut self, source: Source, events: &mut Vec<EngineEvent>) {
        let (ignored_keys, ignored_chars) = match self
            .ctx
            .ignore_sequences()
            .find_match(self.state(source).key_history())
        {
            Some(config) => (config.ignored_keys().len(), config.ignored_chars()),
            None => return,
        };
        let state = self.state_mut(source);
        let removed_chars = state.delete_chars_before(ignored_chars);
        let keep = state.key_history.len().saturating_sub(ignored_keys);
        state.key_history.truncate(keep);
        debug!(removed_chars, "ignore sequence rolled back");
        events.push(EngineEvent::IgnoredSuffix { removed_chars });
    }
}
