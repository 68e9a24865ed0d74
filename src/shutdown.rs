//! Advisory interrupt handling.
//!
//! SIGINT and SIGTERM do not stop the downloader. Intake only ends when the input
//! stream closes, so the listener just tells the operator how to do that.

use tokio::task::JoinHandle;
use tracing::instrument::WithSubscriber;

/// Logged on every interrupt
pub const INTERRUPT_ADVICE: &str =
    "The application doesn't terminate with Ctrl+C, close the input with Ctrl+D instead";

/// Install the interrupt handlers and spawn the task that reports them.
///
/// Handlers are registered before this returns, so an interrupt delivered right
/// afterwards is already caught. Reports go to the subscriber that is current at the
/// call site. Must be called from within a tokio runtime.
#[cfg(unix)]
pub fn spawn_interrupt_listener() -> JoinHandle<()> {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| tracing::warn!(error = %e, "Could not register SIGTERM handler"))
        .ok();
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| tracing::warn!(error = %e, "Could not register SIGINT handler"))
        .ok();

    let listener = async move {
        if sigterm.is_none() && sigint.is_none() {
            tracing::error!("Could not register any signal handlers");
            return;
        }

        loop {
            tokio::select! {
                Some(()) = recv(&mut sigterm) => {
                    tracing::info!(signal = "SIGTERM", "{INTERRUPT_ADVICE}");
                }
                Some(()) = recv(&mut sigint) => {
                    tracing::info!(signal = "SIGINT", "{INTERRUPT_ADVICE}");
                }
                else => break,
            }
        }
    };
    tokio::spawn(listener.with_current_subscriber())
}

#[cfg(unix)]
async fn recv(signal: &mut Option<tokio::signal::unix::Signal>) -> Option<()> {
    match signal {
        Some(signal) => signal.recv().await,
        None => std::future::pending().await,
    }
}

/// Spawn the task that reports Ctrl+C presses.
#[cfg(not(unix))]
pub fn spawn_interrupt_listener() -> JoinHandle<()> {
    let listener = async {
        loop {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!(signal = "ctrl_c", "{INTERRUPT_ADVICE}"),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
                    break;
                }
            }
        }
    };
    tokio::spawn(listener.with_current_subscriber())
}
