use std::process;

use serde::Serialize;

use keyscribe_core::abbreviation::{
    check_limits, derive_abbreviation, AbbreviationLimits, AbbreviationSpec, DerivationBlock,
};
use keyscribe_core::keymap::keys_for_char;
use keyscribe_core::settings::settings;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeriveReport {
    Derived { spec: AbbreviationSpec },
    Disabled { reason: String },
}

fn describe(block: DerivationBlock) -> String {
    match block {
        DerivationBlock::Empty => "no words".to_string(),
        DerivationBlock::TooManyHeadKeywords { count, max } => {
            format!("{count} head keywords (max {max})")
        }
        DerivationBlock::AbbreviationTooLong { len, max } => {
            format!("abbreviation is {len} chars (max {max})")
        }
        DerivationBlock::PhraseTooLong { len, max } => {
            format!("phrase is {len} chars (max {max})")
        }
    }
}

/// Derive as if `phrase` had been typed key by key.
pub fn derive_report(phrase: &str, limits: &AbbreviationLimits) -> DeriveReport {
    let keys: Vec<_> = phrase.chars().filter_map(keys_for_char).flatten().collect();
    match derive_abbreviation(phrase, &keys, limits) {
        Some(spec) => DeriveReport::Derived { spec },
        None => DeriveReport::Disabled {
            reason: check_limits(phrase, limits)
                .err()
                .map_or_else(|| "no words".to_string(), describe),
        },
    }
}

pub fn abbreviate(phrase: &str, json: bool) {
    let report = derive_report(phrase, &settings().limits());
    if json {
        let out = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            process::exit(1);
        });
        println!("{out}");
        return;
    }
    match report {
        DeriveReport::Derived { spec } => {
            println!("readable: {}", spec.readable_string);
            for token in &spec.tokens {
                let kind = if token.is_keyword { "keyword" } else { "abbrev" };
                println!("  {kind:<8}{}", token.value);
            }
            println!("eraser:   {} backspaces", spec.eraser_length());
        }
        DeriveReport::Disabled { reason } => println!("disabled: {reason}"),
    }
}
