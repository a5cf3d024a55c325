// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::registry::PathRegistry;
use crate::types::SyncPolicy;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// policy = "debounced"
/// sync_interval = "10m"
/// syslog = false
///
/// [[path]]
/// from = "/home/me/notes.md"
/// to = "/mnt/backup/notes.md"
/// ```
///
/// All sections are optional at the TOML level; mappings may also come from
/// the command line. Validation happens in [`ConfigFile::try_from`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All mappings from `[[path]]` entries, in file order.
    #[serde(default)]
    pub path: Vec<PathEntry>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// `"debounced"` (default) or `"immediate"`.
    #[serde(default)]
    pub policy: SyncPolicy,

    /// Flush period for the debounced policy, e.g. `"10m"`, `"30s"`.
    #[serde(default = "default_sync_interval")]
    pub sync_interval: String,

    /// Also send copy and watch failures to syslog (unix only).
    #[serde(default)]
    pub syslog: bool,
}

fn default_sync_interval() -> String {
    "10m".to_string()
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            policy: SyncPolicy::default(),
            sync_interval: default_sync_interval(),
            syslog: false,
        }
    }
}

/// `[[path]]` entry: one source mirrored to one destination.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathEntry {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl PathEntry {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Command-line values layered on top of the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Extra mappings, appended after the file's `[[path]]` entries.
    pub paths: Vec<PathEntry>,
    pub policy: Option<SyncPolicy>,
    pub sync_interval: Option<String>,
    /// `--syslog`: can switch syslog on, never off.
    pub syslog: bool,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holding one means the
/// mapping set is non-empty, duplicate-free and absolute, and the interval is
/// usable.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub policy: SyncPolicy,
    pub sync_interval: Duration,
    pub syslog: bool,
    pub registry: PathRegistry,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        policy: SyncPolicy,
        sync_interval: Duration,
        syslog: bool,
        registry: PathRegistry,
    ) -> Self {
        Self {
            policy,
            sync_interval,
            syslog,
            registry,
        }
    }
}

/// Parse a duration like `"500ms"`, `"30s"`, `"10m"` or `"1h"`.
///
/// This is intentionally minimal: a whole number followed by one unit.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ))
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: '{}'", s))
}
