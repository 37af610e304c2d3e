//! Handle to a running server.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::DEFAULT_SHUTDOWN_TIMEOUT;
use crate::error::HttpError;

/// Returned by [`Server::listen`](crate::Server::listen); stops the server
/// on [`close`](Self::close).
#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub(crate) const fn new(addr: SocketAddr, cancel: CancellationToken, task: JoinHandle<()>) -> Self {
        Self { addr, cancel, task }
    }

    /// Address the server is bound to.
    pub const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait up to
    /// [`DEFAULT_SHUTDOWN_TIMEOUT`] for in-flight requests.
    pub async fn close(self) -> Result<(), HttpError> {
        self.close_with_timeout(DEFAULT_SHUTDOWN_TIMEOUT).await
    }

    /// As [`close`](Self::close) with an explicit bound. On timeout the
    /// server task is aborted.
    pub async fn close_with_timeout(self, timeout: Duration) -> Result<(), HttpError> {
        info!(addr = %self.addr, "Shutting down HTTP server");
        self.cancel.cancel();

        let abort = self.task.abort_handle();
        match tokio::time::timeout(timeout, self.task).await {
            Ok(Ok(())) => {
                info!(addr = %self.addr, "HTTP server stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(HttpError::Internal(format!("server task failed: {e}"))),
            Err(_) => {
                abort.abort();
                error!(addr = %self.addr, ?timeout, "HTTP server shutdown timed out");
                Err(HttpError::ShutdownTimeout(timeout))
            }
        }
    }
}
