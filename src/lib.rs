// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod mirror;
pub mod registry;
pub mod sink;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_with_overrides, ConfigFile};
use crate::engine::{CoreRuntime, Runtime, RuntimeOptions, SyncDispatcher};
use crate::mirror::FileMirror;
use crate::sink::{report_target, ChannelErrorSink, DEFAULT_SINK_CAPACITY};
use crate::types::SyncPolicy;
use crate::watch::{register_all, NotifyEventSource};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + command-line overrides)
/// - watch registration for every source
/// - the error sink
/// - core runtime / dispatcher / file mirror
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_with_overrides(args.config.as_deref(), args.overrides())?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    for mapping in cfg.registry.mappings() {
        info!(
            source = %mapping.source.display(),
            destination = %mapping.destination.display(),
            "mirroring"
        );
    }

    // Every source must be watched before the loop starts; a single
    // registration failure aborts startup.
    let (mut source, streams) = NotifyEventSource::new()?;
    register_all(&mut source, &cfg.registry)?;

    let (sink, _sink_task) =
        ChannelErrorSink::spawn_forwarding(DEFAULT_SINK_CAPACITY, report_target(cfg.syslog)?);
    let dispatcher = SyncDispatcher::new(FileMirror::new(), Arc::new(sink));

    // Ctrl-C → stop the loop (pending changes are not flushed).
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = shutdown_tx.send(());
    });

    let options = RuntimeOptions {
        policy: cfg.policy,
        sync_interval: cfg.sync_interval,
    };

    // Construct the pure core runtime (single source of truth for semantics).
    let core = CoreRuntime::new(cfg.registry, options);

    // Construct the async IO shell around the core.
    let runtime = Runtime::new(core, streams, dispatcher).with_shutdown(shutdown_rx);
    let stats = runtime.run().await?;
    debug!(?stats, "runtime finished");

    // Keep the watcher alive for the whole loop.
    drop(source);
    Ok(())
}

/// Simple dry-run output: print policy and mappings.
fn print_dry_run(cfg: &ConfigFile) {
    println!("syncer dry-run");
    println!("  policy = {}", cfg.policy);
    if cfg.policy == SyncPolicy::Debounced {
        println!("  sync_interval = {:?}", cfg.sync_interval);
    }
    println!("  syslog = {}", cfg.syslog);
    println!();

    println!("paths ({}):", cfg.registry.len());
    for mapping in cfg.registry.mappings() {
        println!(
            "  - {} -> {}",
            mapping.source.display(),
            mapping.destination.display()
        );
    }

    debug!("dry-run complete (nothing watched)");
}
