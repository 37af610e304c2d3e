//! Server configuration for the Axum adapter.

use std::path::PathBuf;
use std::time::Duration;

use routedoc_core::{DEFAULT_DOC_PATH, DocInfo};

/// Default port for [`Server::listen`](crate::Server::listen).
pub const DEFAULT_PORT: u16 = 8080;

/// Upper bound on graceful shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Default mount point for the Swagger UI and `doc.json`.
pub const DEFAULT_SWAGGER_PATTERN: &str = "/swagger";

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Where the Swagger UI is mounted and which spec file it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwaggerConfig {
    /// Route prefix, e.g. `/swagger` or `/swagger/*`.
    pub pattern: String,
    /// Spec file rendered for `doc.json`.
    pub path: PathBuf,
}

impl Default for SwaggerConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_SWAGGER_PATTERN.to_string(),
            path: PathBuf::from(DEFAULT_DOC_PATH),
        }
    }
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// CORS policy; `None` disables the CORS layer.
    pub cors: Option<CorsConfig>,
    /// Swagger mount; `None` serves no documentation.
    pub swagger: Option<SwaggerConfig>,
    /// Metadata substituted into the spec file.
    pub doc_info: DocInfo,
    /// Serve template failures as errors instead of raw content.
    pub strict_docs: bool,
    /// Upper bound on graceful shutdown.
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ServerConfig {
    /// Create config with default port and timeout, no CORS, no docs.
    pub fn with_defaults() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors: None,
            swagger: None,
            doc_info: DocInfo::default(),
            strict_docs: false,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Allow requests from any origin.
    #[must_use]
    pub fn with_cors(mut self) -> Self {
        self.cors = Some(CorsConfig::AllowAll);
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = Some(CorsConfig::AllowOrigins(origins));
        self
    }

    /// Serve the spec at `path` under `pattern`.
    #[must_use]
    pub fn with_swagger(mut self, pattern: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.swagger = Some(SwaggerConfig {
            pattern: pattern.into(),
            path: path.into(),
        });
        self
    }

    #[must_use]
    pub fn with_doc_info(mut self, info: DocInfo) -> Self {
        self.doc_info = info;
        self
    }

    #[must_use]
    pub const fn with_strict_docs(mut self, strict: bool) -> Self {
        self.strict_docs = strict;
        self
    }

    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}
