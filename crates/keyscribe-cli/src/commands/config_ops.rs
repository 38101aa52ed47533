use std::fs;
use std::path::Path;
use std::process;

use keyscribe_core::settings::{self, Settings, SettingsError};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigOpsError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Read and validate a settings file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigOpsError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigOpsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(settings::parse_settings_toml(&content)?)
}

/// One-line summary printed by `settings-validate`.
pub fn summary(s: &Settings) -> String {
    format!(
        "OK: classifier.machine_threshold_ms={}, abbreviation.max_head_keywords={}, \
         abbreviation.triggers={}, combos.sentence_end={}",
        s.classifier.machine_threshold_ms,
        s.abbreviation.max_head_keywords,
        s.abbreviation.triggers.len(),
        s.combos.sentence_end.len(),
    )
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let s = die!(load_settings(Path::new(file)), "Error: {}");
    println!("{}", summary(&s));
}
