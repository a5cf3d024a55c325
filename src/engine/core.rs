// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated pending change set
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - waiting on the event streams and the flush timer
//! - performing the copies and reporting errors
//! - handling Ctrl+C / shutdown
//!
//! The core is intended to be unit tested without any Tokio, channels,
//! filesystem, or watcher.

use std::path::Path;

use crate::engine::coalescer::ChangeCoalescer;
use crate::engine::event_handlers::{
    handle_change, handle_flush_tick, handle_shutdown, handle_watch_error, CoreStep,
};
use crate::engine::{RuntimeEvent, RuntimeOptions};
use crate::registry::PathRegistry;

/// Pure core runtime state.
///
/// This owns:
/// - the path registry
/// - the change coalescer and its pending set
/// - runtime options (policy, flush interval)
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    registry: PathRegistry,
    coalescer: ChangeCoalescer,
    options: RuntimeOptions,
}

impl CoreRuntime {
    pub fn new(registry: PathRegistry, options: RuntimeOptions) -> Self {
        Self {
            registry,
            coalescer: ChangeCoalescer::new(),
            options,
        }
    }

    pub fn registry(&self) -> &PathRegistry {
        &self.registry
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// Number of sources waiting for the next flush (for tests).
    pub fn pending_len(&self) -> usize {
        self.coalescer.pending().len()
    }

    pub fn is_pending(&self, source: &Path) -> bool {
        self.coalescer.pending().contains(source)
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::Changed(change) => handle_change(
                &self.registry,
                &mut self.coalescer,
                self.options.policy,
                change,
            ),
            RuntimeEvent::WatchFailed(error) => handle_watch_error(error),
            RuntimeEvent::FlushTick => handle_flush_tick(&self.registry, &mut self.coalescer),
            RuntimeEvent::ShutdownRequested => handle_shutdown(&self.coalescer),
        }
    }
}
