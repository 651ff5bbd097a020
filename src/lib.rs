//! Graceful lifecycle management for an HTTP server.
//!
//! Wraps an opaque [`axum::Router`] with a shutdown coordinator: on SIGINT or
//! SIGTERM (or an explicit [`ShutdownHandle::close`]) the server stops
//! accepting new connections, drains in-flight requests for a bounded grace
//! period, and force-closes if the deadline elapses.
//!
//! ```text
//! unbound → bound → serving → draining → {closed-clean | closed-forced}
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod shutdown;
pub mod signal;

pub use config::ServerConfig;
pub use error::Error;
pub use server::{GracefulServer, DEFAULT_SHUTDOWN_TIMEOUT};
pub use shutdown::ShutdownHandle;
pub use signal::Signal;
