//! Shutdown coordination for the server.
//!
//! # Responsibilities
//! - Carry the shutdown triggers between the serve loop and its callers
//! - Race drain completion against the configured deadline
//! - Provide the forced-close escalation path
//!
//! # Design Decisions
//! - Watch channels instead of broadcast: a trigger fired before the serve
//!   loop subscribes is latched, never lost
//! - Handles are cheap clones so the signal watcher and external callers
//!   share one shutdown entry point

use std::time::Duration;

use tokio::sync::watch;

use crate::error::Error;

/// Handle for shutting down a serving [`GracefulServer`](crate::GracefulServer).
///
/// Obtained via [`GracefulServer::shutdown_handle`](crate::GracefulServer::shutdown_handle)
/// before handing the server to the serve loop. The handle captures the
/// shutdown timeout configured at creation time.
#[derive(Clone)]
pub struct ShutdownHandle {
    /// Tells the serve loop to stop accepting and drain.
    drain: watch::Sender<bool>,
    /// Tells the serve loop to return immediately, abandoning connections.
    force: watch::Sender<bool>,
    /// Set by the serve loop once it has fully drained (or exited).
    drained: watch::Receiver<bool>,
    timeout: Duration,
}

impl ShutdownHandle {
    pub(crate) fn new(
        drain: watch::Sender<bool>,
        force: watch::Sender<bool>,
        drained: watch::Receiver<bool>,
        timeout: Duration,
    ) -> Self {
        Self {
            drain,
            force,
            drained,
            timeout,
        }
    }

    /// Gracefully shut down: stop accepting new connections immediately and
    /// wait for in-flight requests to finish, up to the shutdown timeout.
    ///
    /// Returns `Ok(())` once all in-flight work has drained, or
    /// [`Error::DeadlineExceeded`] if the deadline elapsed first. Either way
    /// the listener is permanently closed; at most one shutdown sequence is
    /// supported per server instance.
    pub async fn close(&self) -> Result<(), Error> {
        tracing::info!(
            timeout = ?self.timeout,
            "shutting down; waiting for in-flight connections to drain"
        );
        let _ = self.drain.send(true);

        let mut drained = self.drained.clone();
        // Bind before matching: the Ok value borrows `drained` and must be
        // dropped first.
        let outcome = tokio::time::timeout(self.timeout, drained.wait_for(|done| *done)).await;
        match outcome {
            Ok(Ok(_)) => Ok(()),
            // Serve loop is already gone; nothing left to drain.
            Ok(Err(_)) => Ok(()),
            Err(_) => Err(Error::DeadlineExceeded),
        }
    }

    /// Hard-close the server: the serve loop returns immediately and any
    /// still-in-flight connections are abandoned. Their handler tasks are not
    /// cancelled; they run to completion in the background with no consumer.
    pub fn force_close(&self) {
        let _ = self.force.send(true);
    }

    /// The drain deadline this handle was created with.
    pub fn shutdown_timeout(&self) -> Duration {
        self.timeout
    }
}
