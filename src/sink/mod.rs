// src/sink/mod.rs

//! Out-of-band error reporting.
//!
//! The core never logs recoverable failures directly; it hands a
//! human-readable message to an [`ErrorSink`]. This keeps the event loop
//! testable with a recording sink and lets production decide where the
//! messages end up: the tracing log, and optionally syslog.

#[cfg(unix)]
pub mod syslog;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::errors::Result;

/// Default capacity of the [`ChannelErrorSink`] buffer.
pub const DEFAULT_SINK_CAPACITY: usize = 256;

/// Receiver of non-fatal error messages.
///
/// `report` is fire-and-forget and must never block the caller.
pub trait ErrorSink: Send + Sync {
    fn report(&self, message: String);
}

impl<S: ErrorSink + ?Sized> ErrorSink for Arc<S> {
    fn report(&self, message: String) {
        (**self).report(message)
    }
}

/// Sink that logs each message synchronously at `error` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, message: String) {
        error!(target: "syncer::report", "{message}");
    }
}

/// Sink that hands every message to each of its targets, in order.
#[derive(Clone, Default)]
pub struct FanoutErrorSink {
    targets: Vec<Arc<dyn ErrorSink>>,
}

impl FanoutErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, target: Arc<dyn ErrorSink>) -> Self {
        self.targets.push(target);
        self
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl ErrorSink for FanoutErrorSink {
    fn report(&self, message: String) {
        if let Some((last, rest)) = self.targets.split_last() {
            for target in rest {
                target.report(message.clone());
            }
            last.report(message);
        }
    }
}

/// Where reports finally end up: the tracing log, plus syslog if asked for.
///
/// Fails on platforms without syslog.
pub fn report_target(use_syslog: bool) -> Result<Arc<dyn ErrorSink>> {
    if !use_syslog {
        return Ok(Arc::new(TracingErrorSink));
    }

    #[cfg(unix)]
    {
        let syslog_sink = syslog::SyslogErrorSink::open(syslog::SyslogConfig::default());
        Ok(Arc::new(
            FanoutErrorSink::new()
                .with(Arc::new(TracingErrorSink))
                .with(Arc::new(syslog_sink)),
        ))
    }

    #[cfg(not(unix))]
    {
        Err(crate::errors::SyncerError::ConfigError(
            "syslog reporting is only available on unix".to_string(),
        ))
    }
}

/// Sink that queues messages for a background task.
///
/// Uses `try_send` on a bounded channel: when the buffer is full the message
/// is dropped and counted rather than stalling the event loop. The drain
/// task forwards each message to its target and reports how many messages
/// were lost once it catches up.
#[derive(Debug, Clone)]
pub struct ChannelErrorSink {
    tx: mpsc::Sender<String>,
    dropped: Arc<AtomicU64>,
}

impl ChannelErrorSink {
    /// Create the sink and spawn a drain task that logs via tracing.
    ///
    /// The drain task exits once every clone of the sink has been dropped.
    pub fn spawn(capacity: usize) -> (Self, JoinHandle<()>) {
        Self::spawn_forwarding(capacity, Arc::new(TracingErrorSink))
    }

    /// Like [`spawn`](Self::spawn), but the drain task forwards to `target`.
    ///
    /// `target` runs on the drain task, off the event loop, so it may be
    /// slower than `report` is allowed to be (e.g. a syslog write).
    pub fn spawn_forwarding(
        capacity: usize,
        target: Arc<dyn ErrorSink>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<String>(capacity.max(1));
        let dropped = Arc::new(AtomicU64::new(0));

        let task_dropped = Arc::clone(&dropped);
        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                target.report(message);

                let lost = task_dropped.swap(0, Ordering::Relaxed);
                if lost > 0 {
                    warn!(lost, "error sink buffer was full; messages dropped");
                }
            }
        });

        (Self { tx, dropped }, handle)
    }

    /// Messages dropped since the drain task last caught up.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl ErrorSink for ChannelErrorSink {
    fn report(&self, message: String) {
        if self.tx.try_send(message).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}
