//! Axum adapter for routedoc.
//!
//! [`Server`] is a small facade over [`axum::Router`]: per-verb route
//! registration, nested subrouters, request-scoped values, CORS, and a
//! Swagger UI backed by a [`routedoc_core::DocRegistry`].

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by integration tests only
#[cfg(test)]
use reqwest as _;

pub mod config;
pub mod docs;
pub mod error;
mod handle;
pub mod middleware;
pub mod server;

pub use config::{
    CorsConfig, DEFAULT_PORT, DEFAULT_SHUTDOWN_TIMEOUT, DEFAULT_SWAGGER_PATTERN, ServerConfig,
    SwaggerConfig,
};
pub use docs::{SwaggerUiConfig, docs_router, render_index};
pub use error::HttpError;
pub use handle::ServerHandle;
pub use middleware::{ContextValues, build_cors_layer};
pub use server::Server;
