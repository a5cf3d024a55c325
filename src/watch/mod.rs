// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Defining what the core consumes from a watcher (`ChangeEvent`,
//!   `WatchError`, the `EventSource` trait).
//! - Wiring up a cross-platform filesystem watcher (`notify`) that observes
//!   individual source files.
//!
//! It does **not** know about pending changes or copying; it only turns
//! filesystem notifications into typed events.

pub mod source;
pub mod watcher;

pub use source::{
    register_all, ChangeEvent, EventSource, EventStreams, Operation, WatchError,
};
pub use watcher::NotifyEventSource;
