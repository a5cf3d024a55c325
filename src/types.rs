// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// When accumulated changes are copied to their destinations.
///
/// - `Debounced`: collect written sources and copy each of them once when the
///   recurring flush timer fires (default behaviour).
/// - `Immediate`: copy a source as soon as its write notification arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPolicy {
    #[default]
    Debounced,
    Immediate,
}

impl FromStr for SyncPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debounced" => Ok(SyncPolicy::Debounced),
            "immediate" => Ok(SyncPolicy::Immediate),
            other => Err(format!(
                "invalid policy: {other} (expected \"debounced\" or \"immediate\")"
            )),
        }
    }
}

impl fmt::Display for SyncPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPolicy::Debounced => f.write_str("debounced"),
            SyncPolicy::Immediate => f.write_str("immediate"),
        }
    }
}

/// Step of a file copy that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStage {
    /// Opening the source for reading.
    OpenSource,
    /// Removing a destination that already exists.
    RemoveDest,
    /// Creating the destination's missing parent directories.
    Mkdir,
    /// Creating the destination file.
    CreateDest,
    /// Streaming bytes from source to destination.
    Copy,
}

impl fmt::Display for CopyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CopyStage::OpenSource => "open-source",
            CopyStage::RemoveDest => "remove-dest",
            CopyStage::Mkdir => "mkdir",
            CopyStage::CreateDest => "create-dest",
            CopyStage::Copy => "copy",
        };
        f.write_str(s)
    }
}
