//! Client-side runtime for a distributed workflow-orchestration platform.
//!
//! A process registers workflow and activity implementations with a
//! [`Worker`], which long-polls the task service for work, executes it
//! under the replay discipline, and reports results back. This crate
//! re-exports the workspace surface and provides the composition-layer
//! glue the core deliberately leaves outside: binding process termination
//! signals to the worker's shutdown handle.

pub use maestro_core::*;
pub use maestro_proto as proto;
pub use maestro_worker::*;

use tracing::{info, warn};

/// Bind process termination (ctrl-c, and SIGTERM on unix) to a worker's
/// shutdown handle.
///
/// The returned task runs until the first signal arrives and then requests
/// stop; the worker blocked in [`Worker::run`] performs the actual
/// teardown. Signal wiring lives here, at the outermost composition layer,
/// so the core stays free of OS-signal mechanics.
pub fn bind_termination_signals(handle: ShutdownHandle) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_termination_signal().await;
        info!("termination signal received, stopping worker");
        handle.request_stop();
    })
}

#[cfg(unix)]
async fn wait_for_termination_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = wait_for_ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(error) => {
            warn!(%error, "failed to install SIGTERM handler");
            wait_for_ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_termination_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
