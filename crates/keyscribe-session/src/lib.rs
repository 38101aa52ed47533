//! Stateful keystroke engine: reconstructs text from raw key codes for the
//! internal and external key sources and reports phrase boundaries,
//! hotkeys and abbreviations as `EngineEvent`s.

mod classifier;
mod commit;
mod context;
mod expansion;
mod ignore;
mod key_handlers;
mod listeners;
mod spelling;
mod state;
mod types;

#[cfg(test)]
mod tests;

use std::time::{SystemTime, UNIX_EPOCH};

pub use classifier::{Classifier, Pace, TypingStats};
pub use context::EngineContext;
pub use ignore::{IgnoreSequenceConfig, IgnoreSequenceError, IgnoreSequenceRegistry};
pub use listeners::{
    EventLog, EventSink, ForegroundCallback, KeypressListener, ListenerRegistry, ListenerResult,
    TrackingCallback,
};
pub use spelling::{SpellingError, SpellingPhase, SpellingSession};
pub use state::ReconState;
pub use types::{
    EngineEvent, InputAbbreviationChangedEvent, Source, TextEntryBeginEvent, TextEntryEndEvent,
};

/// One reconstruction state per key source plus the shared context.
///
/// Calls for one source must be serialized; the two sources never share
/// mutable state.
#[derive(Debug)]
pub struct KeystrokeEngine {
    ctx: EngineContext,
    internal: ReconState,
    external: ReconState,
    spelling: Option<SpellingSession>,
    foreground: bool,
}

impl KeystrokeEngine {
    pub fn new(ctx: EngineContext) -> Self {
        Self {
            ctx,
            internal: ReconState::default(),
            external: ReconState::default(),
            spelling: None,
            foreground: true,
        }
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    pub fn state(&self, source: Source) -> &ReconState {
        match source {
            Source::Internal => &self.internal,
            Source::External => &self.external,
        }
    }

    pub(crate) fn state_mut(&mut self, source: Source) -> &mut ReconState {
        match source {
            Source::Internal => &mut self.internal,
            Source::External => &mut self.external,
        }
    }

    pub fn text(&self, source: Source) -> &str {
        self.state(source).text()
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground
    }

    /// Sync with the host window state; does not invoke the callback.
    pub fn set_foreground(&mut self, foreground: bool) {
        self.foreground = foreground;
    }

    pub fn spelling(&self) -> Option<&SpellingSession> {
        self.spelling.as_ref()
    }

    /// Push `events` to every registered sink and hand them back.
    pub(crate) fn emit(&self, events: Vec<EngineEvent>) -> Vec<EngineEvent> {
        self.ctx.event_sinks().dispatch(&events);
        events
    }
}

impl Default for KeystrokeEngine {
    fn default() -> Self {
        Self::new(EngineContext::default())
    }
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
