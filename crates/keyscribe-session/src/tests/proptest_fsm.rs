//! Property-based tests for the keystroke engine.
//!
//! Generates random key streams for both sources and checks that the
//! reconstruction invariants hold after every action.

use proptest::prelude::*;

use keyscribe_core::keymap::VirtualKey;

use super::vk::*;
use crate::{EngineEvent, KeystrokeEngine, ReconState, Source};

#[derive(Debug, Clone)]
enum Action {
    Key { code: u32, external: bool, gap_ms: u64 },
    Finalize(bool),
    Abort(bool),
    Append(&'static str),
}

fn arb_code() -> impl Strategy<Value = u32> {
    prop_oneof![
        40 => (65u32..=90),
        6 => (48u32..=57),
        10 => Just(SPACE),
        6 => Just(BACKSPACE),
        3 => Just(DELETE),
        3 => Just(ENTER),
        4 => prop::sample::select(vec![LEFT, RIGHT, HOME, END]),
        6 => prop::sample::select(vec![LSHIFT, 161, LCTRL, 163]),
        5 => prop::sample::select(vec![COMMA, PERIOD, SLASH, 186, 222, 189]),
        // Unmapped codes must be dropped.
        1 => prop::sample::select(vec![0u32, 7, 255, 1000]),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        90 => (arb_code(), any::<bool>(), 0u64..600)
            .prop_map(|(code, external, gap_ms)| Action::Key { code, external, gap_ms }),
        3 => any::<bool>().prop_map(Action::Finalize),
        2 => any::<bool>().prop_map(Action::Abort),
        2 => prop::sample::select(vec!["ok", "Hi!", "see you", "é"]).prop_map(Action::Append),
    ]
}

fn execute_action(engine: &mut KeystrokeEngine, action: &Action, clock: &mut u64) -> Vec<EngineEvent> {
    match *action {
        Action::Key { code, external, gap_ms } => {
            *clock += gap_ms;
            engine.process_key_at(code, external, *clock)
        }
        Action::Finalize(external) => engine.finalize_phrase(Source::from_external(external)),
        Action::Abort(external) => engine.abort(Source::from_external(external)),
        Action::Append(text) => engine.append_string(text, Source::Internal, true),
    }
}

fn assert_state_invariants(state: &ReconState, action: &Action) {
    assert!(
        state.cursor() <= state.text().len(),
        "cursor {} past end of {:?} after {:?}",
        state.cursor(),
        state.text(),
        action,
    );
    assert!(
        state.text().is_char_boundary(state.cursor()),
        "cursor {} not on a char boundary of {:?} after {:?}",
        state.cursor(),
        state.text(),
        action,
    );
    assert!(
        state.human_keypress_count() as usize <= state.key_history().len(),
        "more human keypresses than keys after {:?}",
        action,
    );
}

fn assert_invariants(engine: &KeystrokeEngine, events: &[EngineEvent], action: &Action) {
    assert_state_invariants(engine.state(Source::Internal), action);
    assert_state_invariants(engine.state(Source::External), action);

    for event in events {
        match event {
            EngineEvent::TextEntryEnd(end) if !end.is_aborted && !end.repeat_last_nonempty => {
                assert!(!end.text.is_empty(), "empty phrase reported after {:?}", action);
                assert_eq!(end.text.trim(), end.text, "untrimmed phrase after {:?}", action);
                assert!(
                    engine.state(end.source).is_empty(),
                    "state not reset after phrase end, after {:?}",
                    action,
                );
            }
            EngineEvent::AbbreviationChanged(changed) => {
                let spec = &changed.abbreviation_spec;
                assert!(!spec.tokens.is_empty(), "empty abbreviation after {:?}", action);
                assert!(
                    spec.eraser_sequence.iter().all(|&k| k == VirtualKey::BACKSPACE),
                    "eraser holds non-backspace keys after {:?}",
                    action,
                );
            }
            _ => {}
        }
    }

    match *action {
        Action::Finalize(external) | Action::Abort(external) => {
            assert_eq!(
                engine.state(Source::from_external(external)),
                &ReconState::default(),
                "state not reset after {:?}",
                action,
            );
        }
        Action::Key { code, .. } if VirtualKey::from_code(code).is_none() => {
            assert!(events.is_empty(), "unmapped code produced events");
        }
        _ => {}
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn engine_invariants_hold(actions in prop::collection::vec(arb_action(), 1..150)) {
        let mut engine = KeystrokeEngine::default();
        let mut clock = 1_000u64;
        for action in &actions {
            let events = execute_action(&mut engine, action, &mut clock);
            assert_invariants(&engine, &events, action);
        }
    }

    #[test]
    fn every_end_has_a_begin(codes in prop::collection::vec(arb_code(), 1..80)) {
        let mut engine = KeystrokeEngine::default();
        let mut open = false;
        for (i, &code) in codes.iter().enumerate() {
            for event in engine.process_key_at(code, true, 1_000 * (i as u64 + 1)) {
                match event {
                    EngineEvent::TextEntryBegin(_) => open = true,
                    EngineEvent::TextEntryEnd(end) => {
                        prop_assert!(open, "end without begin: {:?}", end.text);
                        open = false;
                    }
                    _ => {}
                }
            }
        }
    }
}
