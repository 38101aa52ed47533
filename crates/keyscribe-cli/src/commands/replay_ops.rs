use std::fs;
use std::path::Path;
use std::process;

use serde::{Deserialize, Serialize};
use tracing::debug;

use keyscribe_session::{EngineContext, EngineEvent, KeystrokeEngine, Source, TypingStats};

use super::config_ops::load_settings;
use super::keymap_ops::codes_for_text;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Gap between replayed keys that carry no timestamp; human pace.
pub const DEFAULT_GAP_MS: u64 = 250;

/// One line of a key log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    pub code: u32,
    #[serde(default)]
    pub external: Option<bool>,
    #[serde(default)]
    pub timestamp_millis: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum KeyLogError {
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a key log: one record per line, either a bare code (`72`) or a
/// JSON object (`{"code": 72, "external": true, "timestamp_millis": 1000}`).
/// Blank lines and `#` comments are skipped.
pub fn parse_key_log(content: &str) -> Result<Vec<KeyRecord>, KeyLogError> {
    let mut records = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let record = match line.parse::<u32>() {
            Ok(code) => KeyRecord {
                code,
                external: None,
                timestamp_millis: None,
            },
            Err(_) => serde_json::from_str(line).map_err(|source| KeyLogError::Json {
                line: i + 1,
                source,
            })?,
        };
        records.push(record);
    }
    Ok(records)
}

/// Feed `records` through `engine`. Records without a timestamp follow the
/// previous one by `DEFAULT_GAP_MS`.
pub fn replay_records(
    engine: &mut KeystrokeEngine,
    records: &[KeyRecord],
    default_external: bool,
) -> Vec<EngineEvent> {
    let mut clock = 0;
    let mut events = Vec::new();
    for record in records {
        clock = record.timestamp_millis.unwrap_or(clock + DEFAULT_GAP_MS);
        let external = record.external.unwrap_or(default_external);
        events.extend(engine.process_key_at(record.code, external, clock));
    }
    debug!(keys = records.len(), events = events.len(), "replay done");
    events
}

#[derive(Debug, Serialize)]
pub struct PhraseStats<'a> {
    pub text: &'a str,
    #[serde(flatten)]
    pub stats: TypingStats,
    pub keystroke_saving_rate: Option<f64>,
}

pub fn phrase_stats(events: &[EngineEvent]) -> Vec<PhraseStats<'_>> {
    events
        .iter()
        .filter_map(EngineEvent::as_end)
        .filter_map(|end| {
            let stats = TypingStats::from_end_event(end)?;
            Some(PhraseStats {
                text: &end.text,
                stats,
                keystroke_saving_rate: stats.keystroke_saving_rate(),
            })
        })
        .collect()
}

fn open_engine(settings_file: Option<&str>) -> KeystrokeEngine {
    let ctx = match settings_file {
        Some(path) => {
            let settings = die!(load_settings(Path::new(path)), "Error: {}");
            die!(EngineContext::new(settings), "Error: {}")
        }
        None => EngineContext::default(),
    };
    KeystrokeEngine::new(ctx)
}

fn print_events(events: &[EngineEvent]) {
    for event in events {
        println!("{}", die!(serde_json::to_string(event), "Error: {}"));
    }
}

fn finish(engine: &mut KeystrokeEngine, events: &mut Vec<EngineEvent>, finalize: bool) {
    if finalize {
        events.extend(engine.finalize_phrase(Source::Internal));
        events.extend(engine.finalize_phrase(Source::External));
    }
}

pub fn replay(file: &str, external: bool, finalize: bool, stats: bool, settings_file: Option<&str>) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let records = die!(parse_key_log(&content), "Error: {}");
    let mut engine = open_engine(settings_file);
    let mut events = replay_records(&mut engine, &records, external);
    finish(&mut engine, &mut events, finalize);
    if stats {
        for phrase in phrase_stats(&events) {
            println!("{}", die!(serde_json::to_string(&phrase), "Error: {}"));
        }
    } else {
        print_events(&events);
    }
}

pub fn type_cmd(text: &str, external: bool, finalize: bool, settings_file: Option<&str>) {
    let codes = codes_for_text(text).unwrap_or_else(|ch| {
        eprintln!("Error: no key types {ch:?}");
        process::exit(1);
    });
    let records: Vec<KeyRecord> = codes
        .into_iter()
        .map(|code| KeyRecord {
            code,
            external: None,
            timestamp_millis: None,
        })
        .collect();
    let mut engine = open_engine(settings_file);
    let mut events = replay_records(&mut engine, &records, external);
    finish(&mut engine, &mut events, finalize);
    print_events(&events);
    let source = Source::from_external(external);
    if !engine.state(source).is_empty() {
        eprintln!("pending {source:?} text: {:?}", engine.text(source));
    }
}
