// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{ConfigOverrides, PathEntry};
use crate::types::SyncPolicy;

/// Command-line arguments for `syncer`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "syncer",
    version,
    about = "Mirror files to backup locations whenever they are written.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `syncer/config.toml` under the platform config directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Extra mapping `FROM=TO`; may be repeated.
    #[arg(long = "path", value_name = "FROM=TO", value_parser = parse_path_pair)]
    pub paths: Vec<PathEntry>,

    /// When to copy: `debounced` (batch on a timer) or `immediate`.
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<SyncPolicy>,

    /// Flush interval for the debounced policy, e.g. `30s`, `10m`.
    #[arg(long, value_name = "DURATION")]
    pub interval: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SYNCER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the mappings, but don't watch anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Also send copy and watch failures to syslog (unix only).
    #[arg(long)]
    pub syslog: bool,
}

impl CliArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            paths: self.paths.clone(),
            policy: self.policy,
            sync_interval: self.interval.clone(),
            syslog: self.syslog,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse `FROM=TO` into a mapping. Splits on the first `=`.
pub fn parse_path_pair(s: &str) -> Result<PathEntry, String> {
    let (from, to) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FROM=TO, got '{s}'"))?;
    if from.is_empty() || to.is_empty() {
        return Err(format!("both sides of '{s}' must be non-empty"));
    }
    Ok(PathEntry::new(from, to))
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
