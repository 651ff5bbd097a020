//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT)
//! - Translate signals to a shutdown trigger
//! - Escalate to a forced close when the drain deadline is exceeded
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The signal source is an injectable future, so tests can simulate
//!   delivery without touching process-wide signal state
//! - The watcher consumes exactly one signal and then terminates; only one
//!   shutdown sequence is ever serviced per server instance

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::error::Error;
use crate::shutdown::ShutdownHandle;

/// A shutdown signal delivered by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Interactive interrupt (ctrl-c / SIGINT).
    Interrupt,
    /// Termination request (SIGTERM).
    Terminate,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Interrupt => write!(f, "SIGINT"),
            Signal::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Boxed future resolving when a shutdown signal arrives.
pub type SignalFuture = Pin<Box<dyn Future<Output = Signal> + Send>>;

/// Default signal source: resolves on the first SIGINT or SIGTERM.
pub fn os_signals() -> SignalFuture {
    Box::pin(async {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut term =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
            tokio::select! {
                _ = tokio::signal::ctrl_c() => Signal::Interrupt,
                _ = term.recv() => Signal::Terminate,
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            Signal::Interrupt
        }
    })
}

/// Background signal watcher, spawned once at listen time.
///
/// Blocks until one signal arrives, triggers a graceful close, and escalates
/// to a hard close only when the drain deadline is exceeded. Any other
/// shutdown error is logged and dropped; forced close is the terminal
/// escalation path.
pub(crate) async fn watch_for_shutdown(signal: SignalFuture, handle: ShutdownHandle) {
    let sig = signal.await;
    tracing::info!(signal = %sig, "triggering shutdown");

    match handle.close().await {
        Ok(()) => {}
        Err(Error::DeadlineExceeded) => {
            tracing::warn!(
                timeout = ?handle.shutdown_timeout(),
                "drain deadline exceeded; forcing shutdown"
            );
            handle.force_close();
        }
        Err(err) => {
            tracing::warn!(error = %err, "error while shutting down");
        }
    }
}
