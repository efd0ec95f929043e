//! Helpers for running a compute server inside the test process.

#![allow(dead_code)]

use std::time::Duration;

use meshlab_client::controls::Control;
use meshlab_client::state::AppSettings;
use meshlab_client::Session;

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Session talking to a fresh instance of the real compute server.
pub async fn session_with_server() -> Session {
    let url = spawn(server::app()).await;
    Session::new(AppSettings::with_server_url(url)).unwrap()
}

/// Session talking to a custom router.
pub async fn session_with(app: axum::Router) -> Session {
    let url = spawn(app).await;
    Session::new(AppSettings::with_server_url(url)).unwrap()
}

/// Poll until `control` is marked in flight.
pub async fn wait_busy(session: &Session, control: Control) {
    for _ in 0..200 {
        if session.gate().is_busy(control) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("{control} never became busy");
}
