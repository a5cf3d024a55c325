use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use syncer::engine::MirrorJob;
use syncer::errors::{CopyError, Result, SyncerError};
use syncer::mirror::Mirror;
use syncer::sink::ErrorSink;
use syncer::types::CopyStage;
use syncer::watch::{ChangeEvent, EventSource, EventStreams, WatchError};

/// Error sink that keeps every message for later assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingErrorSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ErrorSink for RecordingErrorSink {
    fn report(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}

/// A fake mirror that:
/// - records every copy it is asked to perform
/// - fails (at the open-source stage) for sources marked with `fail_for`.
#[derive(Debug, Clone, Default)]
pub struct RecordingMirror {
    attempts: Arc<Mutex<Vec<MirrorJob>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
}

impl RecordingMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, source: impl Into<PathBuf>) {
        self.failing.lock().unwrap().insert(source.into());
    }

    pub fn attempts(&self) -> Vec<MirrorJob> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempted_sources(&self) -> Vec<PathBuf> {
        self.attempts().into_iter().map(|j| j.source).collect()
    }
}

impl Mirror for RecordingMirror {
    fn mirror(&mut self, source: &Path, destination: &Path) -> std::result::Result<u64, CopyError> {
        self.attempts.lock().unwrap().push(MirrorJob {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });

        if self.failing.lock().unwrap().contains(source) {
            return Err(CopyError::new(
                CopyStage::OpenSource,
                source,
                destination,
                io::Error::new(io::ErrorKind::NotFound, "simulated failure"),
            ));
        }
        Ok(0)
    }
}

/// In-process event source driven by the test.
///
/// `watch` succeeds only for paths declared as existing; events are pushed
/// with `emit_*` and both streams close when the source is dropped.
#[derive(Debug)]
pub struct FakeEventSource {
    existing: HashSet<PathBuf>,
    watched: Vec<PathBuf>,
    change_tx: mpsc::UnboundedSender<ChangeEvent>,
    error_tx: mpsc::UnboundedSender<WatchError>,
}

impl FakeEventSource {
    pub fn new<I, P>(existing: I) -> (Self, EventStreams)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let (change_tx, changes) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();
        let source = Self {
            existing: existing.into_iter().map(Into::into).collect(),
            watched: Vec::new(),
            change_tx,
            error_tx,
        };
        (source, EventStreams { changes, errors })
    }

    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }

    pub fn emit(&self, event: ChangeEvent) {
        self.change_tx.send(event).expect("event loop receiver dropped");
    }

    pub fn emit_write(&self, path: impl Into<PathBuf>) {
        self.emit(ChangeEvent::write(path));
    }

    pub fn emit_other(&self, path: impl Into<PathBuf>) {
        self.emit(ChangeEvent::other(path));
    }

    pub fn emit_error(&self, message: &str) {
        self.error_tx
            .send(WatchError::new(message))
            .expect("event loop receiver dropped");
    }
}

impl EventSource for FakeEventSource {
    fn watch(&mut self, path: &Path) -> Result<()> {
        if !self.existing.contains(path) {
            return Err(SyncerError::WatchRegistration {
                path: path.to_path_buf(),
                reason: "no such file".to_string(),
            });
        }
        self.watched.push(path.to_path_buf());
        Ok(())
    }
}
