use super::vk::*;
use super::*;

// --- Text reconstruction (external source, phrase ended by LCtrl+Q) ---

const RECONSTRUCTION_CASES: &[(&str, &[u32], &str)] = &[
    (
        "letters, number, space and punctuation",
        &[72, 73, 188, 32, 87, 49, 190, 162, 81],
        "hi, w1.",
    ),
    ("with exclamation point", &[72, 73, 160, 49, 162, 81], "hi!"),
    ("shift punctuation", &[72, 73, 160, 186, 191, 162, 81], "hi:/"),
    ("repeating LCtrl key", &[72, 73, 162, 162, 81], "hi"),
    ("with new lines", &[72, 73, 188, 13, 87, 162, 81], "hi,\nw"),
    ("with backspace", &[72, 73, 8, 72, 162, 81], "hh"),
    ("with left arrow and inserted char", &[72, 73, 37, 65, 162, 81], "hai"),
    ("with left arrow and backspace", &[72, 73, 37, 8, 162, 81], "i"),
    ("with noop left arrow", &[37, 72, 73, 162, 81], "hi"),
    ("with noop right arrow", &[72, 73, 39, 162, 81], "hi"),
    (
        "with left & right arrow, inserted chars",
        &[72, 73, 37, 65, 39, 65, 162, 81],
        "haia",
    ),
    // Finalized text is trimmed, so the trailing space of "abhi, " goes.
    ("home key", &[72, 73, 188, 32, 36, 65, 66, 162, 81], "abhi,"),
    (
        "home key and end key",
        &[72, 73, 188, 32, 36, 65, 35, 66, 162, 81],
        "ahi, b",
    ),
    ("new line and home key", &[72, 73, 188, 13, 87, 36, 65, 162, 81], "hi,\naw"),
    (
        "new line, home and end key",
        &[72, 73, 188, 13, 87, 36, 35, 65, 162, 81],
        "hi,\nwa",
    ),
    ("with noop home key", &[36, 72, 73, 162, 81], "hi"),
    ("with noop end key", &[72, 73, 35, 162, 81], "hi"),
    ("home and delete key", &[72, 73, 188, 36, 46, 162, 81], "i,"),
    ("1 left arrow and 1 delete key", &[72, 73, 188, 37, 46, 162, 81], "hi"),
    ("2 left arrows and 1 delete key", &[72, 73, 188, 37, 37, 46, 162, 81], "h,"),
];

#[test]
fn test_reconstruction_cases() {
    for &(description, codes, expected) in RECONSTRUCTION_CASES {
        let mut engine = KeystrokeEngine::default();
        let events = press(&mut engine, codes, true);
        let ends = end_events(&events);
        assert_eq!(begin_count(&events), 1, "{description}");
        assert_eq!(ends.len(), 1, "{description}");
        assert_eq!(ends[0].text, expected, "{description}");
        assert!(ends[0].is_final, "{description}");
        assert!(!ends[0].is_aborted, "{description}");

        let begin = events
            .iter()
            .find_map(|e| match e {
                EngineEvent::TextEntryBegin(b) => Some(b.timestamp_millis),
                _ => None,
            })
            .unwrap();
        assert!(ends[0].timestamp_millis >= begin, "{description}");
        assert!(engine.state(Source::External).is_empty(), "{description}");
    }
}

#[test]
fn test_first_key_sends_begin() {
    let mut engine = KeystrokeEngine::default();
    let events = press(&mut engine, &[65], true);
    assert_eq!(begin_count(&events), 1);
    let events = press(&mut engine, &[66], true);
    assert_eq!(begin_count(&events), 0);
}

#[test]
fn test_unmapped_code_is_dropped() {
    let mut engine = KeystrokeEngine::default();
    for code in [0, 7, 91, 255, 9999] {
        assert!(engine.process_key_at(code, true, 0).is_empty());
    }
    assert!(engine.state(Source::External).key_history().is_empty());
    assert_eq!(engine.state(Source::External).last_key_time(), None);
}

// --- Human/machine classification ---

#[test]
fn test_human_and_injected_keys() {
    let mut engine = KeystrokeEngine::default();
    let events = press_timed(
        &mut engine,
        &[
            (65, 0),     // human
            (66, 1000),  // word completion selection by human
            (67, 1010),  // injected
            (68, 1020),  // injected
            (32, 1030),  // injected
            (69, 2000),  // human
            (70, 2010),  // injected
            (162, 3000), // human
            (81, 3600),  // human
        ],
        true,
    );
    assert_eq!(begin_count(&events), 1);
    let ends = end_events(&events);
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].text, "abcd ef");
    assert_eq!(ends[0].num_human_keypresses, Some(5));
    assert_eq!(ends[0].num_keypresses, Some(9));
}

#[test]
fn test_human_count_resets_after_end() {
    let mut engine = KeystrokeEngine::default();
    let events = press_timed(
        &mut engine,
        &[
            (65, 0),
            (162, 1000),
            (81, 2000),
            // Second phrase.
            (65, 3000),
            (66, 4000),
            (67, 4010),
            (162, 5000),
            (81, 6000),
        ],
        true,
    );
    assert_eq!(begin_count(&events), 2);
    let ends = end_events(&events);
    assert_eq!(ends.len(), 2);
    assert_eq!(ends[0].text, "a");
    assert_eq!(ends[0].num_human_keypresses, Some(3));
    assert_eq!(ends[1].text, "abc");
    assert_eq!(ends[1].num_human_keypresses, Some(4));
}

#[test]
fn test_threshold_is_exclusive() {
    let mut engine = KeystrokeEngine::default();
    press_timed(&mut engine, &[(65, 0), (66, 200), (67, 399)], true);
    assert_eq!(engine.state(Source::External).human_keypress_count(), 2);
}

// --- Editing ---

#[test]
fn test_shift_capitalizes_one_letter() {
    let mut engine = KeystrokeEngine::default();
    press(&mut engine, &[LSHIFT, 72, 73], false);
    assert_eq!(engine.text(Source::Internal), "Hi");
    assert!(!engine.state(Source::Internal).shift_active());
}

#[test]
fn test_shift_survives_second_shift() {
    let mut engine = KeystrokeEngine::default();
    press(&mut engine, &[LSHIFT, 161, 72], false);
    assert_eq!(engine.text(Source::Internal), "H");
}

#[test]
fn test_ctrl_backspace_deletes_word() {
    let mut engine = KeystrokeEngine::default();
    type_text(&mut engine, "hello big world  ", false);
    press(&mut engine, &[LCTRL, BACKSPACE], false);
    assert_eq!(engine.text(Source::Internal), "hello big ");
}

#[test]
fn test_word_backspace_combo() {
    let mut engine = KeystrokeEngine::default();
    type_text(&mut engine, "good day", false);
    press(&mut engine, &[LCTRL, LSHIFT, LEFT], false);
    // The left arrow is held back for the combo.
    assert_eq!(engine.state(Source::Internal).cursor(), 8);
    press(&mut engine, &[BACKSPACE], false);
    assert_eq!(engine.text(Source::Internal), "good ");
}

#[test]
fn test_plain_left_arrow_after_shift_moves() {
    let mut engine = KeystrokeEngine::default();
    type_text(&mut engine, "ab", false);
    press(&mut engine, &[LSHIFT, LEFT], false);
    assert_eq!(engine.state(Source::Internal).cursor(), 1);
}

#[test]
fn test_internal_source_ignores_delimiters() {
    let mut engine = KeystrokeEngine::default();
    let mut events = type_text(&mut engine, "hi.", false);
    events.extend(press(&mut engine, &[LCTRL, Q], false));
    assert!(end_events(&events).is_empty());
    assert_eq!(engine.text(Source::Internal), "hi.q");
}

#[test]
fn test_sources_are_independent() {
    let mut engine = KeystrokeEngine::default();
    type_text(&mut engine, "abc", false);
    type_text(&mut engine, "xy", true);
    press(&mut engine, &[BACKSPACE], true);
    assert_eq!(engine.text(Source::Internal), "abc");
    assert_eq!(engine.text(Source::External), "x");
}

#[test]
fn test_punctuation_only_phrase_is_discarded() {
    let mut engine = KeystrokeEngine::default();
    let events = press(&mut engine, &[COMMA, SPACE, PERIOD], true);
    assert!(end_events(&events).is_empty());
    assert!(engine.state(Source::External).is_empty());
    assert!(engine.state(Source::External).key_history().is_empty());
}

#[test]
fn test_question_mark_ends_phrase() {
    let mut engine = KeystrokeEngine::default();
    let events = type_text(&mut engine, "ok?", true);
    let ends = end_events(&events);
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].text, "ok?");
}

#[test]
fn test_unused_keys_do_not_edit() {
    let mut engine = KeystrokeEngine::default();
    type_text(&mut engine, "ab", false);
    press(&mut engine, &[38, 40, 112, 123, LCTRL], false);
    assert_eq!(engine.text(Source::Internal), "ab");
    assert_eq!(engine.state(Source::Internal).cursor(), 2);
}

#[test]
fn test_right_arrow_and_end_at_bounds() {
    let mut engine = KeystrokeEngine::default();
    type_text(&mut engine, "ab", false);
    press(&mut engine, &[RIGHT, END, HOME, HOME, DELETE, DELETE, DELETE], false);
    assert_eq!(engine.text(Source::Internal), "");
    assert_eq!(engine.state(Source::Internal).cursor(), 0);
}

#[test]
fn test_enter_inserts_newline() {
    let mut engine = KeystrokeEngine::default();
    press(&mut engine, &[72, ENTER, 73], false);
    assert_eq!(engine.text(Source::Internal), "h\ni");
}

#[test]
fn test_slash_without_shift() {
    let mut engine = KeystrokeEngine::default();
    press(&mut engine, &[72, SLASH], true);
    assert_eq!(engine.text(Source::External), "h/");
}
