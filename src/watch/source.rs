// src/watch/source.rs

//! Event source abstraction: what the core consumes from a file watcher.

use std::fmt;
use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::ModifyKind;
use tokio::sync::mpsc;
use tracing::debug;

use crate::errors::Result;
use crate::registry::PathRegistry;

/// Coarse classification of a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Write,
    Other,
}

impl Operation {
    /// Data modifications count as writes. `ModifyKind::Any` is included
    /// because some backends cannot tell what kind of modification happened.
    pub fn from_kind(kind: &EventKind) -> Self {
        match kind {
            EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
                Operation::Write
            }
            _ => Operation::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub operation: Operation,
}

impl ChangeEvent {
    pub fn write(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            operation: Operation::Write,
        }
    }

    pub fn other(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            operation: Operation::Other,
        }
    }

    pub fn is_write(&self) -> bool {
        self.operation == Operation::Write
    }

    /// Split a `notify` event into one `ChangeEvent` per affected path.
    pub fn from_notify(event: notify::Event) -> Vec<ChangeEvent> {
        let operation = Operation::from_kind(&event.kind);
        event
            .paths
            .into_iter()
            .map(|path| ChangeEvent { path, operation })
            .collect()
    }
}

/// Error reported by the event source after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchError {
    message: String,
    paths: Vec<PathBuf>,
}

impl WatchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            paths: Vec::new(),
        }
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<notify::Error> for WatchError {
    fn from(err: notify::Error) -> Self {
        // notify's Display already mentions the affected paths.
        let paths = err.paths.clone();
        WatchError::new(err.to_string()).with_paths(paths)
    }
}

/// Receiving halves of an event source: changes and errors arrive on two
/// independent streams.
#[derive(Debug)]
pub struct EventStreams {
    pub changes: mpsc::UnboundedReceiver<ChangeEvent>,
    pub errors: mpsc::UnboundedReceiver<WatchError>,
}

/// Something that can be told to observe individual files.
///
/// Events for registered paths are delivered through the [`EventStreams`]
/// returned alongside the source when it is created.
pub trait EventSource {
    /// Start observing exactly `path` (not a directory tree).
    ///
    /// Fails with `SyncerError::WatchRegistration` if the path cannot be
    /// observed, e.g. because it does not exist.
    fn watch(&mut self, path: &Path) -> Result<()>;
}

/// Register every source of `registry` with `source`.
///
/// Stops at the first failure: running with a partial watch set would
/// silently drop changes for the missing paths.
pub fn register_all<S: EventSource + ?Sized>(
    source: &mut S,
    registry: &PathRegistry,
) -> Result<()> {
    for path in registry.sources() {
        source.watch(path)?;
        debug!(path = %path.display(), "watching source");
    }
    Ok(())
}
