// src/engine/coalescer.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::registry::PathRegistry;
use crate::watch::ChangeEvent;

/// Set of written sources awaiting the next flush.
///
/// Duplicates collapse, so a source written many times between flushes is
/// copied once. Order is irrelevant.
#[derive(Debug, Default)]
pub struct PendingChangeSet {
    paths: HashSet<PathBuf>,
}

impl PendingChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the path was not already pending.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    /// Take every pending path, leaving the set empty.
    pub fn drain(&mut self) -> Vec<PathBuf> {
        self.paths.drain().collect()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// What the coalescer did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coalesced {
    /// Newly added to the pending set.
    Recorded,
    /// Already pending; nothing changed.
    AlreadyPending,
    /// Not a write.
    IgnoredOperation,
    /// Write for a path with no configured destination.
    IgnoredUnknownPath,
}

/// Turns change events into pending sources.
///
/// Only writes to registered sources are kept, so every pending path is
/// guaranteed to have a destination when it is flushed.
#[derive(Debug, Default)]
pub struct ChangeCoalescer {
    pending: PendingChangeSet,
}

impl ChangeCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, registry: &PathRegistry, event: ChangeEvent) -> Coalesced {
        if !event.is_write() {
            trace!(path = %event.path.display(), "ignoring non-write event");
            return Coalesced::IgnoredOperation;
        }
        if !registry.contains(&event.path) {
            debug!(path = %event.path.display(), "ignoring write to unregistered path");
            return Coalesced::IgnoredUnknownPath;
        }

        if self.pending.insert(event.path) {
            Coalesced::Recorded
        } else {
            Coalesced::AlreadyPending
        }
    }

    pub fn drain(&mut self) -> Vec<PathBuf> {
        self.pending.drain()
    }

    pub fn pending(&self) -> &PendingChangeSet {
        &self.pending
    }
}
