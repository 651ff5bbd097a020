//! HTTP server with graceful shutdown.
//!
//! # Responsibilities
//! - Own the bind/listen lifecycle for one server instance
//! - Spawn the background signal watcher at listen time
//! - Drain in-flight connections within a deadline on close
//!
//! # Lifecycle
//! ```text
//! unbound → bound → serving → draining → {closed-clean | closed-forced}
//! ```
//! All transitions are one-directional; there is no resume or re-serve path.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::error::Error;
use crate::shutdown::ShutdownHandle;
use crate::signal::{self, Signal, SignalFuture};

/// Default grace period for in-flight connections on shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

/// An HTTP server that shuts down gracefully on SIGINT/SIGTERM, draining
/// in-flight connections for a bounded grace period before force-closing.
///
/// The request handler is opaque to the coordinator: any [`axum::Router`].
pub struct GracefulServer {
    /// Handler, consumed when the serve loop starts.
    handler: Option<Router>,
    /// Listener, set by a successful `bind` and consumed by `listen`.
    listener: Option<TcpListener>,
    /// Canonical URL, populated only after a successful bind.
    url: Option<String>,
    shutdown_timeout: Duration,
    drain: watch::Sender<bool>,
    force: watch::Sender<bool>,
    drained: watch::Sender<bool>,
    /// Signal source, consumed by the watcher spawned at listen time.
    signal: Option<SignalFuture>,
}

impl GracefulServer {
    /// Create a server for the given handler, watching OS signals and using
    /// the default shutdown timeout. The listener starts unset.
    pub fn new(handler: Router) -> Self {
        let (drain, _) = watch::channel(false);
        let (force, _) = watch::channel(false);
        let (drained, _) = watch::channel(false);
        Self {
            handler: Some(handler),
            listener: None,
            url: None,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            drain,
            force,
            drained,
            signal: Some(signal::os_signals()),
        }
    }

    /// Replace the OS signal source, e.g. with a test-controlled future.
    pub fn set_signal_source(&mut self, source: impl Future<Output = Signal> + Send + 'static) {
        self.signal = Some(Box::pin(source));
    }

    /// Set the grace period `close` allows in-flight connections. Must be
    /// set before shutdown is triggered to take effect.
    pub fn set_shutdown_timeout(&mut self, timeout: Duration) {
        self.shutdown_timeout = timeout;
    }

    /// The configured drain deadline.
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Canonical URL (`http://` + resolved local address), available after a
    /// successful `bind`.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Resolved local address of the bound listener.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Acquire a TCP listener bound to `addr` (`host:port`; an empty host
    /// binds the wildcard interface) and record the resolved URL.
    ///
    /// On failure the server keeps its pre-bind state.
    pub async fn bind(&mut self, addr: &str) -> Result<(), Error> {
        let target = if addr.starts_with(':') {
            format!("0.0.0.0{addr}")
        } else {
            addr.to_string()
        };

        let listener = TcpListener::bind(&target).await.map_err(Error::Bind)?;
        let local_addr = listener.local_addr().map_err(Error::Bind)?;

        self.url = Some(format!("http://{local_addr}"));
        self.listener = Some(listener);

        tracing::info!(address = %local_addr, "listener bound");
        Ok(())
    }

    /// Run the serve loop on the previously bound listener, dispatching each
    /// connection to the handler until shutdown.
    ///
    /// Spawns the signal watcher, then blocks the caller. Returns `Ok(())`
    /// on clean shutdown and on forced close (abandoned connections are not
    /// an error at this level), [`Error::BindRequired`] if `bind` was never
    /// called, or [`Error::Serve`] if the accept loop fails.
    pub async fn listen(&mut self) -> Result<(), Error> {
        let listener = self.listener.take().ok_or(Error::BindRequired)?;
        let handler = self.handler.take().ok_or(Error::BindRequired)?;

        if let Some(source) = self.signal.take() {
            tokio::spawn(signal::watch_for_shutdown(source, self.shutdown_handle()));
        }

        let mut drain = self.drain.subscribe();
        let mut force = self.force.subscribe();

        let serve = axum::serve(listener, handler)
            .with_graceful_shutdown(async move {
                let _ = drain.wait_for(|triggered| *triggered).await;
            })
            .into_future();

        let result = tokio::select! {
            res = serve => res.map_err(Error::Serve),
            _ = force.wait_for(|forced| *forced) => {
                tracing::warn!("serve loop force-closed; abandoning in-flight connections");
                Ok(())
            }
        };

        let _ = self.drained.send(true);
        result
    }

    /// Bind to `addr` and serve. Fails with [`Error::AlreadyBound`] if a
    /// listener already exists, guarding against double-binding.
    pub async fn listen_and_serve(&mut self, addr: &str) -> Result<(), Error> {
        if self.listener.is_some() || self.url.is_some() {
            return Err(Error::AlreadyBound);
        }
        self.bind(addr).await?;
        self.listen().await
    }

    /// Gracefully shut down; see [`ShutdownHandle::close`].
    ///
    /// While `listen` holds the server, use a [`ShutdownHandle`] instead.
    pub async fn close(&mut self) -> Result<(), Error> {
        if self.handler.is_some() {
            // Never entered the serve loop; releasing the listener is the
            // whole shutdown.
            if self.listener.take().is_some() {
                tracing::info!("closing listener before serve loop started");
            }
            return Ok(());
        }
        self.shutdown_handle().close().await
    }

    /// A clonable handle for triggering shutdown while the server is serving.
    /// Captures the currently configured shutdown timeout.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle::new(
            self.drain.clone(),
            self.force.clone(),
            self.drained.subscribe(),
            self.shutdown_timeout,
        )
    }
}
