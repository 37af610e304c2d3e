//! Axum-specific error types and mappings.
//!
//! Lifecycle failures (bind, shutdown) are returned to the caller; document
//! failures are turned into HTTP responses.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use routedoc_core::{RegistryError, TemplateError};
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Graceful shutdown did not finish in time.
    #[error("server did not shut down within {0:?}")]
    ShutdownTimeout(Duration),

    /// A documentation provider failed or is missing.
    #[error(transparent)]
    Doc(#[from] RegistryError),

    /// A built-in page template failed to render.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Doc(RegistryError::NotRegistered(_)) => StatusCode::NOT_FOUND,
            Self::ShutdownTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}
