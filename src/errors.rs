// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::CopyStage;

#[derive(Error, Debug)]
pub enum SyncerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A source could not be registered with the event source. Fatal at
    /// startup: an unwatched source can never trigger a copy.
    #[error("cannot watch {}: {reason}", .path.display())]
    WatchRegistration { path: PathBuf, reason: String },

    #[error(transparent)]
    Copy(#[from] CopyError),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure of a single source -> destination copy.
///
/// Carries enough context (both paths, the failing stage and the underlying
/// IO error) for the message handed to the error sink to be actionable on
/// its own.
#[derive(Error, Debug)]
#[error(
    "copy {} -> {} failed at {stage}: {cause}",
    .source_path.display(),
    .destination.display()
)]
pub struct CopyError {
    pub stage: CopyStage,
    pub source_path: PathBuf,
    pub destination: PathBuf,
    #[source]
    pub cause: io::Error,
}

impl CopyError {
    pub fn new(
        stage: CopyStage,
        source_path: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        cause: io::Error,
    ) -> Self {
        Self {
            stage,
            source_path: source_path.into(),
            destination: destination.into(),
            cause,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SyncerError>;
