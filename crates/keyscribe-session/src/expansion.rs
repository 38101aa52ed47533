//! Abbreviation triggers and the engine side of spelling refinement.

use tracing::debug;

use keyscribe_core::abbreviation::{derive_abbreviation, AbbreviationSpec};
use keyscribe_core::combo::ComboAction;
use keyscribe_core::keymap::VirtualKey;
use keyscribe_core::text::finalize_text;

use super::spelling::{SpellingError, SpellingSession};
use super::types::{EngineEvent, InputAbbreviationChangedEvent, Source};
use super::KeystrokeEngine;

fn changed(spec: AbbreviationSpec, request_expansion: bool) -> EngineEvent {
    EngineEvent::AbbreviationChanged(InputAbbreviationChangedEvent {
        abbreviation_spec: spec,
        request_expansion,
    })
}

impl KeystrokeEngine {
    /// Derive an abbreviation from the current text of `source`, sizing the
    /// eraser by every key typed so far. `None` when derivation is disabled.
    pub fn current_abbreviation(&self, source: Source) -> Option<AbbreviationSpec> {
        let state = self.state(source);
        derive_abbreviation(
            &finalize_text(state.text()),
            state.key_history(),
            &self.ctx.settings().limits(),
        )
    }

    /// Manual trigger (an "expand" button). Emits nothing when derivation
    /// is disabled for the current text.
    pub fn trigger_abbreviation(
        &mut self,
        source: Source,
        request_expansion: bool,
    ) -> Vec<EngineEvent> {
        let events = self
            .current_abbreviation(source)
            .map(|spec| changed(spec, request_expansion))
            .into_iter()
            .collect();
        self.emit(events)
    }

    /// Auto-trigger on a configured trigger sequence (double space, Enter).
    pub(crate) fn maybe_trigger_abbreviation(
        &mut self,
        source: Source,
        events: &mut Vec<EngineEvent>,
    ) {
        if !self.ctx.settings().abbreviation.auto_trigger
            || self.spelling.as_ref().is_some_and(SpellingSession::is_spelling)
        {
            return;
        }
        let state = self.state(source);
        let history = state.key_history();
        let Some(trigger_len) = self
            .ctx
            .combos()
            .longest_match(ComboAction::AbbreviationTrigger, history)
        else {
            return;
        };
        // The trigger keys typed no part of the abbreviation.
        let keys = &history[..history.len() - trigger_len];
        let phrase = finalize_text(state.text());
        let Some(spec) = derive_abbreviation(&phrase, keys, &self.ctx.settings().limits()) else {
            return;
        };
        debug!(readable = %spec.readable_string, eraser = spec.eraser_length(), "abbreviation triggered");
        events.push(changed(spec, true));
    }

    /// Begin refining `spec` by spelling out its tokens. Replaces any
    /// session in progress.
    pub fn start_spelling(&mut self, spec: AbbreviationSpec) {
        debug!(lineage = %spec.lineage_id, "spelling started");
        self.spelling = Some(SpellingSession::new(spec));
    }

    /// Like `start_spelling`, with the abbreviation split into letters.
    pub fn start_spelling_letters(&mut self, spec: AbbreviationSpec) {
        debug!(lineage = %spec.lineage_id, "spelling started");
        self.spelling = Some(SpellingSession::with_letter_tokens(spec));
    }

    /// Spell token `index`; letters typed into the internal source from
    /// now on form the word.
    pub fn choose_spelling_token(&mut self, index: usize) -> Result<(), SpellingError> {
        let session = self.spelling.as_mut().ok_or(SpellingError::NoSession)?;
        session.choose_token(index, &self.internal.text)
    }

    /// End the current spelling round without a trigger key.
    pub fn finish_spelling(&mut self) -> Result<Vec<EngineEvent>, SpellingError> {
        let session = self.spelling.as_mut().ok_or(SpellingError::NoSession)?;
        let events = session
            .finish()
            .map(|spec| changed(spec, true))
            .into_iter()
            .collect();
        Ok(self.emit(events))
    }

    pub fn cancel_spelling(&mut self) -> Option<SpellingSession> {
        self.spelling.take()
    }

    pub(crate) fn feed_spelling(&mut self, key: VirtualKey, events: &mut Vec<EngineEvent>) {
        let Some(session) = self.spelling.as_mut() else {
            return;
        };
        if let Some(spec) = session.on_keypress(key, &self.internal.text) {
            debug!(readable = %spec.readable_string, "spelling round done");
            events.push(changed(spec, true));
        }
    }
}
