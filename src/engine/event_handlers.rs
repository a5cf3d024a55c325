// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::engine::coalescer::{ChangeCoalescer, Coalesced};
use crate::engine::MirrorJob;
use crate::registry::PathRegistry;
use crate::types::SyncPolicy;
use crate::watch::{ChangeEvent, WatchError};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Copy each job's source to its destination.
    Mirror(Vec<MirrorJob>),
    /// Hand this message to the error sink.
    Report(String),
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn idle() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }

    fn with(command: CoreCommand) -> Self {
        Self {
            commands: vec![command],
            keep_running: true,
        }
    }
}

/// Handle a change notification.
///
/// - `Debounced`: record the write; copying waits for the next flush tick.
/// - `Immediate`: a write to a registered source is copied right away and
///   never touches the pending set.
pub fn handle_change(
    registry: &PathRegistry,
    coalescer: &mut ChangeCoalescer,
    policy: SyncPolicy,
    event: ChangeEvent,
) -> CoreStep {
    match policy {
        SyncPolicy::Debounced => {
            let path = event.path.clone();
            let outcome = coalescer.record(registry, event);
            if outcome == Coalesced::Recorded {
                debug!(path = %path.display(), "source queued for next flush");
            }
            CoreStep::idle()
        }
        SyncPolicy::Immediate => {
            if !event.is_write() {
                return CoreStep::idle();
            }
            match job_for(registry, event.path) {
                Some(job) => CoreStep::with(CoreCommand::Mirror(vec![job])),
                None => CoreStep::idle(),
            }
        }
    }
}

/// Handle an error reported by the event source.
///
/// Never fatal: the message goes to the error sink and watching continues.
pub fn handle_watch_error(error: WatchError) -> CoreStep {
    CoreStep::with(CoreCommand::Report(format!("watch error: {error}")))
}

/// Handle a flush tick: drain everything pending into one batch.
///
/// The pending set is empty afterwards whatever the copies' outcome; a
/// failed source is only retried if it is written again.
pub fn handle_flush_tick(registry: &PathRegistry, coalescer: &mut ChangeCoalescer) -> CoreStep {
    let drained = coalescer.drain();
    if drained.is_empty() {
        return CoreStep::idle();
    }

    let mut jobs: Vec<MirrorJob> = drained
        .into_iter()
        .filter_map(|path| job_for(registry, path))
        .collect();
    // Stable order makes batches and logs reproducible.
    jobs.sort_by(|a, b| a.source.cmp(&b.source));

    CoreStep::with(CoreCommand::Mirror(jobs))
}

/// Handle a shutdown request. Pending paths are dropped, not flushed.
pub fn handle_shutdown(coalescer: &ChangeCoalescer) -> CoreStep {
    let pending = coalescer.pending().len();
    if pending > 0 {
        warn!(pending, "shutting down with unflushed changes");
    }
    CoreStep {
        commands: Vec::new(),
        keep_running: false,
    }
}

fn job_for(registry: &PathRegistry, source: PathBuf) -> Option<MirrorJob> {
    match registry.destination_for(&source) {
        Some(destination) => {
            let destination = destination.to_path_buf();
            Some(MirrorJob {
                source,
                destination,
            })
        }
        None => {
            debug!(path = %source.display(), "no destination registered; skipping");
            None
        }
    }
}
