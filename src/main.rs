use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use canvasboard::command::{Command, CommandError};
use canvasboard::config::{ConfigError, EngineConfig};
use canvasboard::engine::{Engine, SnapshotError};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum ReplayError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("script line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("command {index} failed: {source}")]
    Command {
        index: usize,
        #[source]
        source: CommandError,
    },
    #[error("write failed: {0}")]
    Write(#[from] io::Error),
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Replay a command script against a fresh canvas and print the result.
#[derive(Parser, Debug)]
#[command(name = "canvasboard", about = "Replay canvas board command scripts")]
struct Cli {
    /// Script file: a JSON array of commands, or one command per line.
    script: PathBuf,

    /// Snapshot to load before replaying.
    #[arg(long, env = "CANVAS_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Print compact JSON instead of pretty JSON.
    #[arg(long)]
    compact: bool,

    /// Print the change journal instead of the final snapshot.
    #[arg(long)]
    changes: bool,
}

fn main() -> Result<(), ReplayError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("canvasboard=info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut engine = Engine::with_config(EngineConfig::from_env()?)?;
    if cli.changes {
        engine = engine.with_journal();
    }

    if let Some(path) = &cli.snapshot {
        engine.restore_json(&read(path)?)?;
    }

    let commands = parse_script(&read(&cli.script)?)?;
    info!(commands = commands.len(), script = %cli.script.display(), "replaying");
    for (index, command) in commands.into_iter().enumerate() {
        let outcome = engine.apply(command).map_err(|source| ReplayError::Command { index, source })?;
        info!(index, ?outcome, "applied");
    }

    let mut out = io::stdout().lock();
    if cli.changes {
        for change in engine.take_changes() {
            serde_json::to_writer(&mut out, &change)?;
            writeln!(out)?;
        }
    } else {
        let snapshot = engine.snapshot();
        if cli.compact {
            serde_json::to_writer(&mut out, &snapshot)?;
        } else {
            serde_json::to_writer_pretty(&mut out, &snapshot)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, ReplayError> {
    fs::read_to_string(path).map_err(|source| ReplayError::Read { path: path.to_path_buf(), source })
}

/// A script is either one JSON array or JSON lines. Blank lines and lines
/// starting with `#` are skipped in the line form.
fn parse_script(raw: &str) -> Result<Vec<Command>, ReplayError> {
    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(raw).map_err(|source| ReplayError::Parse { line: source.line(), source });
    }
    let mut commands = Vec::new();
    for (n, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = serde_json::from_str(line).map_err(|source| ReplayError::Parse { line: n + 1, source })?;
        commands.push(command);
    }
    Ok(commands)
}
