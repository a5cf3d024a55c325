// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, ConfigOverrides, PathEntry, RawConfigFile};
use crate::errors::{Result, SyncerError};

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// Relative `from`/`to` paths are resolved against the directory holding
/// the file. No semantic validation happens here; use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut config: RawConfigFile = toml::from_str(&contents)?;

    let base = config_base_dir(path)?;
    for entry in config.path.iter_mut() {
        *entry = resolve_entry(&base, entry);
    }

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - at least one mapping,
///   - a usable sync interval,
///   - empty, relative, duplicate or self-mapped paths.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the file (if any), layer command-line overrides on top, validate.
///
/// - `path = Some(..)`: the file must exist.
/// - `path = None`: the default location is used if it exists; otherwise the
///   overrides alone must supply the mappings.
///
/// Relative override paths are resolved against the current directory.
pub fn load_with_overrides(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<ConfigFile> {
    let mut raw = match path {
        Some(path) => load_from_path(path)?,
        None => {
            let default_path = default_config_path();
            if default_path.is_file() {
                debug!(path = %default_path.display(), "using default config file");
                load_from_path(&default_path)?
            } else if !overrides.paths.is_empty() {
                debug!(
                    path = %default_path.display(),
                    "no default config file; using command-line mappings only"
                );
                RawConfigFile::default()
            } else {
                return Err(SyncerError::ConfigError(format!(
                    "no config file at {} and no --path given",
                    default_path.display()
                )));
            }
        }
    };

    let cwd = std::env::current_dir()?;
    raw.path
        .extend(overrides.paths.iter().map(|entry| resolve_entry(&cwd, entry)));

    if let Some(policy) = overrides.policy {
        raw.config.policy = policy;
    }
    if let Some(interval) = overrides.sync_interval {
        raw.config.sync_interval = interval;
    }
    if overrides.syslog {
        raw.config.syslog = true;
    }

    ConfigFile::try_from(raw)
}

/// Default config location: `<config dir>/syncer/config.toml`, where the
/// config dir is platform specific (`$XDG_CONFIG_HOME` or `~/.config` on
/// Linux). Falls back to the current directory if it cannot be determined.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("syncer")
        .join("config.toml")
}

/// Directory that relative paths in the config file are resolved against.
///
/// A bare file name like `config.toml` (parent = "") resolves against the
/// current working directory.
fn config_base_dir(config_path: &Path) -> Result<PathBuf> {
    let parent = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok(std::path::absolute(parent)?)
}

fn resolve_entry(base: &Path, entry: &PathEntry) -> PathEntry {
    PathEntry {
        from: resolve(base, &entry.from),
        to: resolve(base, &entry.to),
    }
}

/// Empty paths are left alone so validation can report them as empty.
fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() || path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
