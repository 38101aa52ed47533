mod basic;
mod proptest_fsm;

use keyscribe_core::keymap::codes_for_char;

use super::types::{EngineEvent, InputAbbreviationChangedEvent, Source, TextEntryEndEvent};
use super::KeystrokeEngine;

// Windows virtual key codes
pub(super) mod vk {
    pub const BACKSPACE: u32 = 8;
    pub const ENTER: u32 = 13;
    pub const SPACE: u32 = 32;
    pub const END: u32 = 35;
    pub const HOME: u32 = 36;
    pub const LEFT: u32 = 37;
    pub const RIGHT: u32 = 39;
    pub const DELETE: u32 = 46;
    pub const LSHIFT: u32 = 160;
    pub const LCTRL: u32 = 162;
    pub const COMMA: u32 = 188;
    pub const PERIOD: u32 = 190;
    pub const SLASH: u32 = 191;
    pub const Q: u32 = 81;
}

/// Press each code one second after the previous key of the same source,
/// so every key counts as human-paced. Returns all events produced.
pub(super) fn press(engine: &mut KeystrokeEngine, codes: &[u32], is_external: bool) -> Vec<EngineEvent> {
    let source = Source::from_external(is_external);
    let mut events = Vec::new();
    for &code in codes {
        let now = engine
            .state(source)
            .last_key_time()
            .map_or(1_000, |t| t + 1_000);
        events.extend(engine.process_key_at(code, is_external, now));
    }
    events
}

/// Press timed keys: `(code, timestamp_millis)`.
pub(super) fn press_timed(
    engine: &mut KeystrokeEngine,
    keys: &[(u32, u64)],
    is_external: bool,
) -> Vec<EngineEvent> {
    keys.iter()
        .flat_map(|&(code, t)| engine.process_key_at(code, is_external, t))
        .collect()
}

pub(super) fn codes_for(text: &str) -> Vec<u32> {
    text.chars()
        .flat_map(|c| codes_for_char(c).unwrap_or_else(|| panic!("no key for {c:?}")))
        .collect()
}

pub(super) fn type_text(engine: &mut KeystrokeEngine, text: &str, is_external: bool) -> Vec<EngineEvent> {
    press(engine, &codes_for(text), is_external)
}

pub(super) fn end_events(events: &[EngineEvent]) -> Vec<&TextEntryEndEvent> {
    events.iter().filter_map(EngineEvent::as_end).collect()
}

pub(super) fn abbreviation_events(events: &[EngineEvent]) -> Vec<&InputAbbreviationChangedEvent> {
    events.iter().filter_map(EngineEvent::as_abbreviation).collect()
}

pub(super) fn begin_count(events: &[EngineEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, EngineEvent::TextEntryBegin(_)))
        .count()
}
