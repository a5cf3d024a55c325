#![allow(dead_code)]

use std::path::PathBuf;

use syncer::config::{ConfigFile, ConfigSection, PathEntry, RawConfigFile};
use syncer::registry::PathRegistry;
use syncer::types::SyncPolicy;

/// Builder for `RawConfigFile` to simplify test setup.
pub struct RawConfigBuilder {
    config: RawConfigFile,
}

impl RawConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                path: Vec::new(),
            },
        }
    }

    pub fn with_path(mut self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        self.config.path.push(PathEntry::new(from, to));
        self
    }

    pub fn policy(mut self, policy: SyncPolicy) -> Self {
        self.config.config.policy = policy;
        self
    }

    pub fn syslog(mut self, enabled: bool) -> Self {
        self.config.config.syslog = enabled;
        self
    }

    pub fn sync_interval(mut self, interval: &str) -> Self {
        self.config.config.sync_interval = interval.to_string();
        self
    }

    /// The unvalidated config, for tests that expect validation to fail.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for RawConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry from literal `(source, destination)` pairs.
pub fn registry(pairs: &[(&str, &str)]) -> PathRegistry {
    PathRegistry::from_pairs(pairs.iter().copied()).expect("Failed to build registry")
}
