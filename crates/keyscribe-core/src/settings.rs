//! Settings loaded from TOML, with a process-wide default.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`
//!
//! Engines take an explicit `Settings`; the singleton only backs defaults.

use std::sync::OnceLock;

use serde::Deserialize;

use crate::abbreviation::AbbreviationLimits;
use crate::combo::{ComboAction, ComboConfig, ComboError, ComboRegistry, KeyPattern};

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
    #[error(transparent)]
    Combo(#[from] ComboError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub classifier: ClassifierSettings,
    pub abbreviation: AbbreviationSettings,
    pub combos: ComboSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSettings {
    pub machine_threshold_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbbreviationSettings {
    pub max_head_keywords: usize,
    pub max_abbreviation_length: usize,
    pub max_total_length: usize,
    #[serde(default = "default_true")]
    pub auto_trigger: bool,
    #[serde(default)]
    pub triggers: Vec<Vec<KeyPattern>>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComboSettings {
    pub foreground_toggle: Vec<KeyPattern>,
    pub tracking_toggle: Vec<KeyPattern>,
    pub word_backspace: Vec<KeyPattern>,
    pub phrase_end: Vec<Vec<KeyPattern>>,
    pub sentence_end: Vec<Vec<KeyPattern>>,
}

impl Settings {
    pub fn limits(&self) -> AbbreviationLimits {
        AbbreviationLimits {
            max_head_keywords: self.abbreviation.max_head_keywords,
            max_abbreviation_length: self.abbreviation.max_abbreviation_length,
            max_total_length: self.abbreviation.max_total_length,
        }
    }

    /// Build the combo registry in precedence order: hotkeys, word
    /// backspace, phrase end, sentence end, abbreviation triggers.
    pub fn combo_registry(&self) -> Result<ComboRegistry, ComboError> {
        let c = &self.combos;
        let mut registry = ComboRegistry::new();
        let mut add = |action: ComboAction, keys: &[KeyPattern]| {
            registry.register(ComboConfig::new(action, keys.to_vec())?)
        };
        add(ComboAction::ToggleForeground, &c.foreground_toggle)?;
        add(ComboAction::ToggleTracking, &c.tracking_toggle)?;
        add(ComboAction::WordBackspace, &c.word_backspace)?;
        for keys in &c.phrase_end {
            add(ComboAction::PhraseEnd, keys)?;
        }
        for keys in &c.sentence_end {
            add(ComboAction::SentenceEnd, keys)?;
        }
        for keys in &self.abbreviation.triggers {
            add(ComboAction::AbbreviationTrigger, keys)?;
        }
        Ok(registry)
    }
}

impl Default for Settings {
    fn default() -> Self {
        settings().clone()
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    s.combo_registry()?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }
    macro_rules! check_non_empty {
        ($section:ident . $field:ident) => {
            if s.$section.$field.is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        };
    }

    check_positive!(classifier.machine_threshold_ms);
    check_positive!(abbreviation.max_abbreviation_length);
    check_positive!(abbreviation.max_total_length);

    check_non_empty!(combos.foreground_toggle);
    check_non_empty!(combos.tracking_toggle);
    check_non_empty!(combos.word_backspace);
    check_non_empty!(combos.phrase_end);

    if s.combos.word_backspace.len() < 2 {
        return Err(SettingsError::InvalidValue {
            field: "combos.word_backspace".to_string(),
            reason: "needs at least two keys".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::VirtualKey;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.classifier.machine_threshold_ms, 200);
        assert_eq!(s.abbreviation.max_head_keywords, 4);
        assert_eq!(s.abbreviation.max_abbreviation_length, 10);
        assert_eq!(s.abbreviation.max_total_length, 50);
        assert!(s.abbreviation.auto_trigger);
        assert_eq!(s.abbreviation.triggers.len(), 2);
        assert_eq!(
            s.combos.phrase_end,
            vec![vec![
                KeyPattern::Key(VirtualKey::LCTRL),
                KeyPattern::Key(VirtualKey::Letter('q'))
            ]]
        );
        assert_eq!(s.combos.sentence_end.len(), 3);
        assert_eq!(s.limits(), AbbreviationLimits::default());
    }

    #[test]
    fn default_registry_covers_every_action() {
        let reg = settings().combo_registry().unwrap();
        for action in [
            ComboAction::ToggleForeground,
            ComboAction::ToggleTracking,
            ComboAction::WordBackspace,
            ComboAction::PhraseEnd,
            ComboAction::SentenceEnd,
            ComboAction::AbbreviationTrigger,
        ] {
            assert!(reg.iter().any(|c| c.action() == action), "{action:?}");
        }
    }

    #[test]
    fn error_unknown_key_name() {
        let toml = DEFAULT_SETTINGS_TOML.replace(r#"["lctrl", "q"]"#, r#"["hyper", "q"]"#);
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().contains("hyper"));
    }

    #[test]
    fn error_zero_threshold() {
        let toml = DEFAULT_SETTINGS_TOML.replace("machine_threshold_ms = 200", "machine_threshold_ms = 0");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { ref field, .. } if field == "classifier.machine_threshold_ms"));
    }

    #[test]
    fn error_duplicate_combo() {
        let toml = DEFAULT_SETTINGS_TOML.replace(
            r#"phrase_end = [["lctrl", "q"]]"#,
            r#"phrase_end = [["lctrl", "q"], ["lctrl", "q"]]"#,
        );
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::Combo(ComboError::Duplicate { .. })));
    }

    #[test]
    fn error_empty_phrase_end() {
        let toml = DEFAULT_SETTINGS_TOML.replace(r#"phrase_end = [["lctrl", "q"]]"#, "phrase_end = []");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn auto_trigger_defaults_on() {
        let toml = DEFAULT_SETTINGS_TOML.replace("auto_trigger = true\n", "");
        let s = parse_settings_toml(&toml).unwrap();
        assert!(s.abbreviation.auto_trigger);
    }
}
