// src/watch/watcher.rs

use std::path::Path;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::info;

use crate::errors::{Result, SyncerError};
use crate::watch::source::{ChangeEvent, EventSource, EventStreams, WatchError};

/// [`EventSource`] backed by the platform's recommended `notify` watcher.
///
/// The underlying `RecommendedWatcher` lives as long as this value; dropping
/// it stops file watching and eventually closes both event streams.
pub struct NotifyEventSource {
    inner: RecommendedWatcher,
}

impl std::fmt::Debug for NotifyEventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyEventSource").finish()
    }
}

impl NotifyEventSource {
    /// Create the watcher and the two streams it feeds.
    ///
    /// No path is observed until [`EventSource::watch`] is called.
    pub fn new() -> Result<(Self, EventStreams)> {
        let (change_tx, change_rx) = mpsc::unbounded_channel::<ChangeEvent>();
        let (error_tx, error_rx) = mpsc::unbounded_channel::<WatchError>();

        // Called synchronously by notify on its own thread.
        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for change in ChangeEvent::from_notify(event) {
                        if change_tx.send(change).is_err() {
                            // Receiver gone: the event loop has exited.
                            return;
                        }
                    }
                }
                Err(err) => {
                    let _ = error_tx.send(WatchError::from(err));
                }
            },
            Config::default(),
        )
        .map_err(|e| SyncerError::Other(e.into()))?;

        Ok((
            Self { inner },
            EventStreams {
                changes: change_rx,
                errors: error_rx,
            },
        ))
    }
}

impl EventSource for NotifyEventSource {
    fn watch(&mut self, path: &Path) -> Result<()> {
        self.inner
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| SyncerError::WatchRegistration {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        info!("file watcher started on {:?}", path);
        Ok(())
    }
}
