//! Error types for the server lifecycle.

use thiserror::Error;

/// Errors surfaced by [`GracefulServer`](crate::GracefulServer) operations.
///
/// Shutdown escalation decisions branch on the variant rather than comparing
/// error values: the signal watcher forces a close only on
/// [`Error::DeadlineExceeded`].
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to acquire the TCP listener (address malformed, in use,
    /// or otherwise unavailable).
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    /// `listen_and_serve` was called while a listener already exists.
    #[error("listener already bound; call listen() directly")]
    AlreadyBound,

    /// `listen` was called before a successful `bind`. Programmer error,
    /// not a runtime condition.
    #[error("no listener bound; call bind() first")]
    BindRequired,

    /// The accept/serve loop failed with a transport-level error.
    #[error("serve loop error: {0}")]
    Serve(#[source] std::io::Error),

    /// Graceful drain did not finish within the configured shutdown timeout.
    #[error("shutdown deadline exceeded")]
    DeadlineExceeded,
}
