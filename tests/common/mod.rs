//! Shared utilities for graceful shutdown integration tests.

use std::time::Duration;

use axum::{routing::get, Router};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use graceful_server::{Error, GracefulServer, ShutdownHandle};

/// Router with an instant route at `/` and a slow route at `/slow` that
/// sleeps for `delay` before responding.
pub fn test_router(delay: Duration) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route(
            "/slow",
            get(move || async move {
                tokio::time::sleep(delay).await;
                "slow"
            }),
        )
}

/// Like [`test_router`], but `/slow` reports entry on the returned channel
/// before sleeping, so tests can wait until a request is actually in flight
/// instead of sleeping for a guessed client-setup duration.
#[allow(dead_code)]
pub fn slow_router_with_entry(delay: Duration) -> (Router, mpsc::UnboundedReceiver<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let router = Router::new().route("/", get(|| async { "ok" })).route(
        "/slow",
        get(move || {
            let tx = tx.clone();
            async move {
                let _ = tx.send(());
                tokio::time::sleep(delay).await;
                "slow"
            }
        }),
    );
    (router, rx)
}

/// Bind to an ephemeral port and start serving in the background.
///
/// Returns the server URL, a shutdown handle, and the serve task.
#[allow(dead_code)]
pub async fn start_server(
    router: Router,
    shutdown_timeout: Duration,
) -> (String, ShutdownHandle, JoinHandle<Result<(), Error>>) {
    let mut server = GracefulServer::new(router);
    server.set_shutdown_timeout(shutdown_timeout);
    server.bind("127.0.0.1:0").await.expect("bind failed");

    let url = server.url().expect("url set after bind").to_string();
    let handle = server.shutdown_handle();

    let task = tokio::spawn(async move { server.listen().await });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (url, handle, task)
}
