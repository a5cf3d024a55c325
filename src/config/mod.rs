// src/config/mod.rs

//! Configuration loading and validation for syncer.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and merge command-line overrides
//!   (`loader.rs`).
//! - Validate the mapping set and timing values (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_with_overrides};
pub use validate::MAX_SYNC_INTERVAL;
pub use model::{
    parse_duration, ConfigFile, ConfigOverrides, ConfigSection, PathEntry, RawConfigFile,
};
