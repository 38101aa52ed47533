use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use keyscribe_cli::commands::{abbreviation_ops, config_ops, keymap_ops, replay_ops};

#[derive(Parser)]
#[command(name = "keytool", about = "Keyscribe keystroke engine diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a key log through the engine and print the events as JSON lines
    Replay {
        /// Key log: one code or JSON record per line
        file: String,
        /// Treat records without a source as internal keys
        #[arg(long)]
        internal: bool,
        /// Finalize both sources after the last key
        #[arg(long)]
        finalize: bool,
        /// Print keystroke savings per phrase instead of events
        #[arg(long)]
        stats: bool,
        /// Settings TOML to use instead of the defaults
        #[arg(long)]
        settings: Option<String>,
    },
    /// Type text through the engine at human pace and print the events
    Type {
        /// Text to type (US layout)
        text: String,
        /// Type into the internal source
        #[arg(long)]
        internal: bool,
        /// Finalize both sources after the last key
        #[arg(long)]
        finalize: bool,
        /// Settings TOML to use instead of the defaults
        #[arg(long)]
        settings: Option<String>,
    },
    /// Derive the abbreviation for a phrase
    Abbreviate {
        /// Phrase, e.g. "a good tiaths"
        phrase: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the virtual key table
    Keys,
    /// Print the key codes that type some text
    Codes {
        /// Text to look up
        text: String,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            file,
            internal,
            finalize,
            stats,
            settings,
        } => replay_ops::replay(&file, !internal, finalize, stats, settings.as_deref()),
        Command::Type {
            text,
            internal,
            finalize,
            settings,
        } => replay_ops::type_cmd(&text, !internal, finalize, settings.as_deref()),
        Command::Abbreviate { phrase, json } => abbreviation_ops::abbreviate(&phrase, json),
        Command::Keys => keymap_ops::keys(),
        Command::Codes { text } => keymap_ops::codes(&text),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
