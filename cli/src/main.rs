//! elig CLI — driving adapter for the elig eligibility engine.
//!
//! ```text
//! elig <SUBJECT_FILE> <CONDITIONS_FILE> [--max-depth N] [--quiet]
//! ```
//!
//! Exit codes:
//! - `0` — evaluated (either verdict)
//! - `1` — missing or invalid arguments
//! - `2` — subject document unreadable or unparsable
//! - `3` — condition set unreadable, unparsable, not a mapping, or too deep

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use elig::ConditionSet;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`EnvFilter` syntax).
const LOG_ENV: &str = "ELIG_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "elig",
    version,
    about = "Check whether a record satisfies a condition set"
)]
struct Cli {
    /// Subject document (JSON, or YAML for .yaml/.yml).
    subject: PathBuf,

    /// Condition-set document (JSON, or YAML for .yaml/.yml).
    conditions: PathBuf,

    /// Reject condition sets nested deeper than this.
    #[arg(long, default_value_t = elig::MAX_DEPTH)]
    max_depth: usize,

    /// Print only `true` or `false`.
    #[arg(long, short)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here, on stdout.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_tracing();

    match run(&cli) {
        Ok(eligible) => {
            if cli.quiet {
                println!("{eligible}");
            } else {
                println!("Eligibility: {eligible}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("{}", Cli::command().render_usage());
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Command
// ═══════════════════════════════════════════════════════════════════════════════

fn run(cli: &Cli) -> Result<bool, CliError> {
    let subject: Value = load_document(&cli.subject).map_err(|source| CliError::Subject {
        path: cli.subject.display().to_string(),
        source,
    })?;

    let conditions: ConditionSet =
        load_document(&cli.conditions).map_err(|source| CliError::Conditions {
            path: cli.conditions.display().to_string(),
            source,
        })?;

    let depth = conditions.depth();
    tracing::debug!(entries = conditions.len(), depth, "condition set loaded");
    if depth > cli.max_depth {
        return Err(CliError::TooDeep {
            path: cli.conditions.display().to_string(),
            depth,
            max: cli.max_depth,
        });
    }

    let eligible = conditions.is_satisfied_by(&subject);
    tracing::info!(eligible, "evaluated");
    Ok(eligible)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Document loading
// ═══════════════════════════════════════════════════════════════════════════════

/// Read and parse a document: YAML for `.yaml`/`.yml`, JSON otherwise.
fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = std::fs::read_to_string(path)?;

    let is_yaml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid subject \"{path}\": {source}")]
    Subject {
        path: String,
        #[source]
        source: LoadError,
    },

    #[error("invalid conditions \"{path}\": {source}")]
    Conditions {
        path: String,
        #[source]
        source: LoadError,
    },

    #[error("conditions \"{path}\" nest {depth} levels deep (max {max})")]
    TooDeep {
        path: String,
        depth: usize,
        max: usize,
    },
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Subject { .. } => 2,
            Self::Conditions { .. } | Self::TooDeep { .. } => 3,
        }
    }
}
