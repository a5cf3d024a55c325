// src/engine/dispatcher.rs

use std::sync::Arc;

use tracing::{info, warn};

use crate::engine::MirrorJob;
use crate::mirror::Mirror;
use crate::sink::ErrorSink;

/// Outcome counters for one dispatched batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Copies batches of jobs through a [`Mirror`] and routes failures to an
/// [`ErrorSink`].
///
/// Every job in a batch is attempted even if earlier ones fail; each failure
/// produces its own report.
pub struct SyncDispatcher<M: Mirror> {
    mirror: M,
    sink: Arc<dyn ErrorSink>,
}

impl<M: Mirror> std::fmt::Debug for SyncDispatcher<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncDispatcher").finish_non_exhaustive()
    }
}

impl<M: Mirror> SyncDispatcher<M> {
    pub fn new(mirror: M, sink: Arc<dyn ErrorSink>) -> Self {
        Self { mirror, sink }
    }

    pub fn dispatch(&mut self, jobs: Vec<MirrorJob>) -> DispatchReport {
        let mut report = DispatchReport::default();

        for job in jobs {
            report.attempted += 1;
            match self.mirror.mirror(&job.source, &job.destination) {
                Ok(_bytes) => report.succeeded += 1,
                Err(err) => {
                    report.failed += 1;
                    self.sink.report(err.to_string());
                }
            }
        }

        if report.failed > 0 {
            warn!(
                attempted = report.attempted,
                failed = report.failed,
                "sync batch finished with failures"
            );
        } else if report.attempted > 0 {
            info!(copied = report.succeeded, "sync batch finished");
        }

        report
    }

    /// Forward a message to the error sink.
    pub fn report(&self, message: String) {
        self.sink.report(message);
    }
}
