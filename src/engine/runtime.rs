// src/engine/runtime.rs

use std::fmt;
use std::future;

use tokio::sync::oneshot;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::errors::{Result, SyncerError};
use crate::mirror::Mirror;
use crate::types::SyncPolicy;
use crate::watch::EventStreams;

use super::core::CoreRuntime;
use super::dispatcher::SyncDispatcher;
use super::{CoreCommand, RuntimeEvent};

/// Counters accumulated over a runtime's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub flushes: usize,
    pub copies_attempted: usize,
    pub copies_failed: usize,
    pub watch_errors: usize,
}

/// Result of one multiplexed wait, before it is mapped to a `RuntimeEvent`.
enum Wake {
    Event(RuntimeEvent),
    ChangesClosed,
    ErrorsClosed,
    ShutdownLost,
}

/// Drives the core in response to watcher events and timer ticks, and
/// delegates copying to a [`SyncDispatcher`].
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// runtime semantics. It owns the single loop that reads both event streams
/// and the flush timer, so the pending change set is only ever touched from
/// one task.
pub struct Runtime<M: Mirror> {
    core: CoreRuntime,
    streams: EventStreams,
    dispatcher: SyncDispatcher<M>,
    shutdown: Option<oneshot::Receiver<()>>,
    ticker: Option<Interval>,
    changes_open: bool,
    errors_open: bool,
    stats: RuntimeStats,
}

impl<M: Mirror> fmt::Debug for Runtime<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<M: Mirror> Runtime<M> {
    pub fn new(core: CoreRuntime, streams: EventStreams, dispatcher: SyncDispatcher<M>) -> Self {
        Self {
            core,
            streams,
            dispatcher,
            shutdown: None,
            ticker: None,
            changes_open: true,
            errors_open: true,
            stats: RuntimeStats::default(),
        }
    }

    /// Stop the loop when `rx` fires. Pending changes are not flushed.
    pub fn with_shutdown(mut self, rx: oneshot::Receiver<()>) -> Self {
        self.shutdown = Some(rx);
        self
    }

    /// Main event loop.
    ///
    /// - Waits for the next change, watcher error, flush tick or shutdown.
    /// - Feeds it into the core runtime.
    /// - Executes commands returned by the core (copy batches, reports).
    ///
    /// Returns when shutdown is requested or both event streams have closed.
    pub async fn run(mut self) -> Result<RuntimeStats> {
        let options = *self.core.options();
        if options.policy == SyncPolicy::Debounced {
            // First tick one full period from now, not immediately.
            let period = options.sync_interval;
            let start = Instant::now().checked_add(period).ok_or_else(|| {
                SyncerError::ConfigError(format!("sync interval {period:?} is out of range"))
            })?;
            let mut ticker = time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            self.ticker = Some(ticker);
        }

        info!(
            policy = %options.policy,
            interval = ?options.sync_interval,
            sources = self.core.registry().len(),
            "syncer runtime started"
        );

        while let Some(event) = self.next_event().await {
            debug!(?event, "runtime received event");

            match &event {
                RuntimeEvent::FlushTick => self.stats.flushes += 1,
                RuntimeEvent::WatchFailed(_) => self.stats.watch_errors += 1,
                _ => {}
            }

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command);
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!(stats = ?self.stats, "runtime exiting");
        Ok(self.stats)
    }

    /// Wait for whichever input is ready first.
    ///
    /// Returns `None` once neither event stream can produce anything more.
    async fn next_event(&mut self) -> Option<RuntimeEvent> {
        loop {
            if !self.changes_open && !self.errors_open {
                info!("event streams closed; exiting");
                return None;
            }

            let wake = tokio::select! {
                maybe = self.streams.changes.recv(), if self.changes_open => match maybe {
                    Some(change) => Wake::Event(RuntimeEvent::Changed(change)),
                    None => Wake::ChangesClosed,
                },
                maybe = self.streams.errors.recv(), if self.errors_open => match maybe {
                    Some(error) => Wake::Event(RuntimeEvent::WatchFailed(error)),
                    None => Wake::ErrorsClosed,
                },
                _ = next_tick(&mut self.ticker) => Wake::Event(RuntimeEvent::FlushTick),
                fired = wait_shutdown(&mut self.shutdown) => {
                    if fired {
                        Wake::Event(RuntimeEvent::ShutdownRequested)
                    } else {
                        Wake::ShutdownLost
                    }
                }
            };

            match wake {
                Wake::Event(event) => return Some(event),
                Wake::ChangesClosed => {
                    debug!("change stream closed");
                    self.changes_open = false;
                }
                Wake::ErrorsClosed => {
                    debug!("watch error stream closed");
                    self.errors_open = false;
                }
                Wake::ShutdownLost => {
                    warn!("shutdown signal sender dropped; Ctrl-C will not stop the loop");
                    self.shutdown = None;
                }
            }
        }
    }

    /// Execute a single command from the core.
    fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::Mirror(jobs) => {
                let report = self.dispatcher.dispatch(jobs);
                self.stats.copies_attempted += report.attempted;
                self.stats.copies_failed += report.failed;
            }
            CoreCommand::Report(message) => self.dispatcher.report(message),
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending().await,
    }
}

/// Resolves `true` when shutdown was signalled, `false` if the sender went
/// away without signalling. Never resolves when no receiver is installed.
async fn wait_shutdown(rx: &mut Option<oneshot::Receiver<()>>) -> bool {
    match rx {
        Some(rx) => rx.await.is_ok(),
        None => future::pending().await,
    }
}
