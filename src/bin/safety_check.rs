//! Safety check CLI
//!
//! Runs the engine over a JSON snapshot of the app's record store and prints
//! the evaluation as JSON.
//!
//! Usage:
//!   safety-check <snapshot.json> [--catalog <file>] [--config <file>] [--now <rfc3339>] [--pretty]
//!   safety-check --print-catalog [--catalog <file>]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::Parser;
use symptom_safety::config::{self, EngineConfig};
use symptom_safety::{evaluate, EngineError, EngineInputs, MemoryStore, RedFlagCatalog};

#[derive(Parser)]
#[command(name = "safety-check")]
#[command(version)]
#[command(about = "Red-flag, escalation and compliance checks over a record snapshot")]
#[command(long_about = None)]
struct Cli {
    /// Snapshot file: a JSON object with one array per record kind
    #[arg(required_unless_present = "print_catalog")]
    snapshot: Option<PathBuf>,

    /// Red-flag catalog (JSON). Defaults to the built-in catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Print the red-flag catalog in effect and exit
    #[arg(long)]
    print_catalog: bool,

    /// Engine configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Evaluation instant (RFC 3339). Defaults to the current time
    #[arg(long)]
    now: Option<String>,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    config::init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Safety check failed");
            eprintln!("safety-check: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, EngineError> {
    let catalog = load_catalog(cli.catalog.as_deref())?;

    if cli.print_catalog {
        return render(&catalog, cli.pretty);
    }

    let snapshot = cli
        .snapshot
        .as_deref()
        .ok_or_else(|| EngineError::Store("no snapshot file given".into()))?;
    let engine_config = match cli.config.as_deref() {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    let now = parse_now(cli.now.as_deref())?;

    tracing::info!(
        engine = config::ENGINE_NAME,
        version = config::ENGINE_VERSION,
        catalog_version = catalog.version(),
        "Running safety check"
    );

    let store = MemoryStore::from_snapshot_path(snapshot)?;
    let inputs = EngineInputs::load(&store)?;
    let evaluation = evaluate(inputs, &catalog, &engine_config, now)?;
    render(&evaluation, cli.pretty)
}

fn load_catalog(path: Option<&Path>) -> Result<RedFlagCatalog, EngineError> {
    match path {
        Some(path) => RedFlagCatalog::from_path(path),
        None => Ok(RedFlagCatalog::builtin()),
    }
}

fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>, EngineError> {
    match raw {
        None => Ok(Utc::now()),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| EngineError::InvalidConfig(format!("--now '{s}': {e}"))),
    }
}

fn render<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, EngineError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}
