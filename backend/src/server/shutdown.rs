//! Shutdown signal handling.
//!
//! Only a delivered signal starts the drain. A handler that cannot be
//! installed is logged and then treated as a source that never fires.

use std::future::{Future, pending};
use std::io;

use tracing::warn;

async fn delivered_or_pending<F>(name: &'static str, signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(error) = signal.await {
        warn!(%error, signal = name, "signal handler unavailable");
        pending::<()>().await;
    }
}

/// Resolve once either `interrupt` or `terminate` reports a delivered signal.
pub async fn first_signal<I, T>(interrupt: I, terminate: T)
where
    I: Future<Output = io::Result<()>>,
    T: Future<Output = io::Result<()>>,
{
    tokio::select! {
        () = delivered_or_pending("ctrl-c", interrupt) => {}
        () = delivered_or_pending("SIGTERM", terminate) => {}
    }
}

#[cfg(unix)]
async fn sigterm() -> io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut stream = signal(SignalKind::terminate())?;
    match stream.recv().await {
        Some(()) => Ok(()),
        None => Err(io::Error::other("SIGTERM stream closed")),
    }
}

#[cfg(not(unix))]
async fn sigterm() -> io::Result<()> {
    pending().await
}

/// Wait for ctrl-c or SIGTERM.
pub async fn shutdown_signal() {
    first_signal(tokio::signal::ctrl_c(), sigterm()).await;
}
