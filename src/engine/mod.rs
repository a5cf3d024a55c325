// src/engine/mod.rs

//! Orchestration engine for syncer.
//!
//! This module ties together:
//! - the pending change set (which written sources still need copying)
//! - the dispatcher that copies a batch and reports failures
//! - the main runtime event loop that reacts to:
//!   - change notifications
//!   - watcher errors
//!   - flush timer ticks
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;
use std::time::Duration;

use crate::types::SyncPolicy;
use crate::watch::{ChangeEvent, WatchError};

/// Default interval between flushes of the pending change set.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// A resolved copy request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MirrorJob {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    pub policy: SyncPolicy,
    /// Flush period for [`SyncPolicy::Debounced`]; unused otherwise.
    pub sync_interval: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            policy: SyncPolicy::default(),
            sync_interval: DEFAULT_SYNC_INTERVAL,
        }
    }
}

/// One thing that happened, as seen by the event loop.
///
/// The runtime waits on all of its inputs at once and yields exactly one of
/// these per step.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// The event source reported a change.
    Changed(ChangeEvent),
    /// The event source reported an error after startup.
    WatchFailed(WatchError),
    /// The flush timer fired.
    FlushTick,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod coalescer;
pub mod core;
pub mod dispatcher;
pub mod event_handlers;
pub mod runtime;

pub use coalescer::{ChangeCoalescer, Coalesced, PendingChangeSet};
pub use self::core::CoreRuntime;
pub use dispatcher::{DispatchReport, SyncDispatcher};
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::{Runtime, RuntimeStats};
