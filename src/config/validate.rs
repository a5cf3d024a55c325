// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{parse_duration, ConfigFile, RawConfigFile};
use crate::errors::{Result, SyncerError};
use crate::registry::PathRegistry;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SyncerError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_paths(&raw)?;
        let sync_interval = validate_sync_interval(&raw)?;
        let registry = PathRegistry::from_pairs(raw.path.into_iter().map(|p| (p.from, p.to)))?;
        Ok(ConfigFile::new_unchecked(
            raw.config.policy,
            sync_interval,
            raw.config.syslog,
            registry,
        ))
    }
}

fn ensure_has_paths(cfg: &RawConfigFile) -> Result<()> {
    if cfg.path.is_empty() {
        return Err(SyncerError::ConfigError(
            "config must contain at least one [[path]] entry (or pass --path FROM=TO)"
                .to_string(),
        ));
    }
    Ok(())
}

/// Longest accepted flush period (one year).
pub const MAX_SYNC_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

fn validate_sync_interval(cfg: &RawConfigFile) -> Result<Duration> {
    let interval = parse_duration(&cfg.config.sync_interval).map_err(|e| {
        SyncerError::ConfigError(format!("[config].sync_interval: {e}"))
    })?;

    if interval.is_zero() {
        return Err(SyncerError::ConfigError(
            "[config].sync_interval must be greater than zero".to_string(),
        ));
    }

    if interval > MAX_SYNC_INTERVAL {
        return Err(SyncerError::ConfigError(format!(
            "[config].sync_interval {interval:?} exceeds the maximum of {MAX_SYNC_INTERVAL:?}"
        )));
    }

    Ok(interval)
}
