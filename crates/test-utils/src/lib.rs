//! Shared helpers for syncer's integration tests.

pub mod builders;
pub mod fakes;

use std::sync::Once;
use std::time::Duration;

use syncer::engine::RuntimeStats;
use syncer::errors::Result;
use tokio::task::JoinHandle;
use tracing_subscriber::{fmt, EnvFilter};

/// How long a spawned event loop may take to wind down once its inputs close.
pub const LOOP_EXIT_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness capture.
///
/// Filter with `RUST_LOG` (e.g. `RUST_LOG=syncer=debug`); defaults to `info`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await a spawned `Runtime::run` task.
///
/// Panics if the loop is still running after [`LOOP_EXIT_TIMEOUT`] or if the
/// task itself panicked; the loop's own result is returned unchanged.
pub async fn join_runtime(handle: JoinHandle<Result<RuntimeStats>>) -> Result<RuntimeStats> {
    tokio::time::timeout(LOOP_EXIT_TIMEOUT, handle)
        .await
        .expect("event loop did not stop in time")
        .expect("event loop task panicked")
}
