//! Shared helpers for routedoc-axum integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use routedoc_axum::{Server, ServerHandle};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Start `server` on an ephemeral localhost port.
///
/// Returns the base URL (`http://127.0.0.1:<port>`) and the running handle.
pub async fn start(server: Server) -> (String, ServerHandle) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let handle = server.listen_on(listener).expect("Failed to start server");
    let base_url = format!("http://127.0.0.1:{}", handle.local_addr().port());
    (base_url, handle)
}

/// Write `contents` to `name` inside a fresh temp dir.
///
/// The dir must outlive the server reading the file.
pub fn write_spec(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write spec");
    (dir, path)
}
