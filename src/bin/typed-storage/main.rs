mod logging;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use typed_storage::codec::parse_date;
use typed_storage::{
    BackendError, CodecError, Config, ConfigError, DurableBackend, Pattern, TypedStore, TypedValue,
};

use crate::logging::LoggingError;

/// CLI-specific errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Library error (wraps all typed_storage errors)
    #[error(transparent)]
    Library(#[from] typed_storage::Error),

    /// Logging setup error
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// Value given on the command line could not be parsed
    #[error("Invalid value: {0:#}")]
    Input(#[from] anyhow::Error),

    /// Key not found and no default given
    #[error("Key '{0}' not found")]
    KeyNotFound(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Library(e.into())
    }
}

#[derive(Parser)]
#[command(name = "typed-storage")]
#[command(about = "Store typed values in a durable string key-value store")]
struct Cli {
    /// Store path (overrides the config file)
    #[arg(long, global = true, env = "TYPED_STORAGE_PATH")]
    path: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true, env = "TYPED_STORAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Return falsy values (0, false) instead of substituting the default
    #[arg(long, global = true)]
    strict: bool,

    /// Log filter, e.g. "debug" or "typed_storage=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// How a command-line value is interpreted.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputKind {
    String,
    Number,
    Bool,
    Date,
    Pattern,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a value under a key
    Set {
        /// Key for the value
        key: String,

        /// Value text, interpreted according to --kind
        value: String,

        /// Kind of the value
        #[arg(short, long, value_enum, default_value = "string")]
        kind: InputKind,

        /// Pattern flags (only with --kind pattern)
        #[arg(long)]
        flags: Option<String>,
    },

    /// Print the value stored under a key
    Get {
        /// Key for the value
        key: String,

        /// Printed when the key holds no readable value
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Print whether a key holds a record
    Has {
        /// Key to check
        key: String,
    },

    /// Delete a key
    Remove {
        /// Key to delete
        key: String,
    },

    /// Print the stored record of a key without decoding it
    Raw {
        /// Key for the record
        key: String,
    },

    /// List stored keys
    List,

    /// Delete every key
    Clear,
}

/// Format an error for user-friendly display
fn format_error(err: &AppError) -> String {
    use std::io::IsTerminal;

    let use_colors = std::io::stderr().is_terminal();

    let (red, yellow, reset) = if use_colors {
        ("\x1b[0;31m", "\x1b[0;33m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    let mut output = format!("{}Error:{} {}\n", red, reset, err);

    if let Some(hint) = get_error_hint(err) {
        output.push_str(&format!("{}Hint:{} {}\n", yellow, reset, hint));
    }

    output
}

/// Get a helpful hint for common errors
fn get_error_hint(err: &AppError) -> Option<&'static str> {
    match err {
        AppError::Library(typed_storage::Error::Codec(CodecError::MalformedPayload(_))) => {
            Some("Use 'typed-storage raw <KEY>' to inspect the stored record")
        }
        AppError::Library(typed_storage::Error::Backend(BackendError::FormatMismatch {
            ..
        })) => Some("The store was written by an incompatible version; use another --path"),
        AppError::Library(typed_storage::Error::Config(_)) => {
            Some("Check the file passed with --config")
        }
        AppError::KeyNotFound(_) => {
            Some("Use 'typed-storage list' to see stored keys, or pass --default")
        }
        AppError::Input(_) => Some("Use --kind to choose how the value is parsed"),
        AppError::Logging(LoggingError::InvalidFilter(_)) => {
            Some("Use a filter such as 'info' or 'typed_storage=debug'")
        }
        _ => None,
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprint!("{}", format_error(&err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(path) = cli.path {
        config.storage.path = path;
    }
    if cli.strict {
        config.codec.mask_falsy = false;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    logging::init(&config.logging)?;

    let store: TypedStore<DurableBackend> =
        TypedStore::open_local(&config.storage.path, config.codec)?;

    match cli.command {
        Commands::Set {
            key,
            value,
            kind,
            flags,
        } => {
            let value = parse_input(kind, &value, flags.as_deref())?;
            let value_kind = value.kind();
            store.set(&key, value)?;
            println!("Stored {} under '{}'", value_kind, key);
            Ok(())
        }
        Commands::Get { key, default } => match store.get(&key)? {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => match default {
                Some(default) => {
                    println!("{}", default);
                    Ok(())
                }
                None => Err(AppError::KeyNotFound(key)),
            },
        },
        Commands::Has { key } => {
            println!("{}", store.has(&key)?);
            Ok(())
        }
        Commands::Remove { key } => {
            store.remove(&key)?;
            println!("Removed '{}'", key);
            Ok(())
        }
        Commands::Raw { key } => match store.get_raw(&key)? {
            Some(record) => {
                println!("{}", record);
                Ok(())
            }
            None => Err(AppError::KeyNotFound(key)),
        },
        Commands::List => {
            for key in store.keys()? {
                println!("{}", key);
            }
            Ok(())
        }
        Commands::Clear => {
            store.clear()?;
            println!("Cleared {}", config.storage.path.display());
            Ok(())
        }
    }
}

/// Interpret command-line text as a typed value.
fn parse_input(kind: InputKind, text: &str, flags: Option<&str>) -> anyhow::Result<TypedValue> {
    if flags.is_some() && !matches!(kind, InputKind::Pattern) {
        bail!("--flags only applies to --kind pattern");
    }

    let value = match kind {
        InputKind::String => TypedValue::from(text),
        InputKind::Number => {
            let n: f64 = text
                .trim()
                .parse()
                .with_context(|| format!("'{}' is not a number", text))?;
            TypedValue::Number(n)
        }
        InputKind::Bool => match text.trim() {
            "true" | "1" => TypedValue::Boolean(true),
            "false" | "0" => TypedValue::Boolean(false),
            other => bail!("'{}' is not a boolean (use true or false)", other),
        },
        InputKind::Date => {
            let date = parse_date(text)
                .with_context(|| format!("'{}' is not an RFC 3339 or RFC 2822 date", text))?;
            TypedValue::Date(date)
        }
        InputKind::Pattern => {
            let pattern = Pattern::with_flags(text, flags.unwrap_or_default());
            pattern
                .to_regex()
                .with_context(|| format!("'{}' is not a valid regular expression", text))?;
            TypedValue::Pattern(pattern)
        }
        InputKind::Json => {
            let json: serde_json::Value =
                serde_json::from_str(text).context("value is not valid JSON")?;
            TypedValue::from_json(json)
        }
    };
    Ok(value)
}
