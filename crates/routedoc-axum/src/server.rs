//! Route facade over [`axum::Router`].
//!
//! [`Server`] collects routes and middleware with `&mut self` calls and is
//! materialised into a router by [`Server::into_router`] or started with
//! [`Server::listen`]. Middleware (value injection, CORS) is applied at
//! materialisation time, so it covers every route regardless of call order.
//!
//! ```ignore
//! let mut server = Server::new();
//! server.get("/health", || async { "OK" });
//! server.route("/api", |api| {
//!     api.get("/pets", list_pets).post("/pets", add_pet);
//! });
//! server.with_value("tenant", "acme".to_string());
//! server.allow_cors();
//! server.swagger("/swagger/*", "docs/swagger.yaml");
//!
//! let handle = server.listen(8080).await?;
//! // ...
//! handle.close().await?;
//! ```

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::handler::Handler;
use axum::middleware::{self, Next};
use axum::routing::{self, MethodRouter};
use routedoc_core::{DocInfo, DocRegistry, SWAGGER_DOC_NAME, SwaggerDoc};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::config::{CorsConfig, ServerConfig};
use crate::docs::{SwaggerUiConfig, docs_router};
use crate::error::HttpError;
use crate::handle::ServerHandle;
use crate::middleware::{ContextValues, build_cors_layer, inject_values};

/// HTTP server facade holding an axum router.
#[derive(Debug)]
pub struct Server {
    router: Router,
    registry: Arc<DocRegistry>,
    doc_info: DocInfo,
    strict_docs: bool,
    values: ContextValues,
    cors: Option<CorsLayer>,
    /// Prefixes already serving the docs router.
    docs_mounts: HashSet<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! verb {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub fn $name<H, T>(&mut self, pattern: &str, handler: H) -> &mut Self
        where
            H: Handler<T, ()>,
            T: 'static,
        {
            self.add(pattern, routing::$name(handler))
        }
    };
}

impl Server {
    /// Create a server with an empty router and its own doc registry.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(DocRegistry::new()))
    }

    /// Create a server that publishes documents into `registry`.
    pub fn with_registry(registry: Arc<DocRegistry>) -> Self {
        Self {
            router: Router::new(),
            registry,
            doc_info: DocInfo::default(),
            strict_docs: false,
            values: ContextValues::new(),
            cors: None,
            docs_mounts: HashSet::new(),
        }
    }

    /// Build a server from configuration: CORS, doc info and Swagger mount.
    pub fn from_config(config: &ServerConfig) -> Self {
        let mut server = Self::new();
        server.set_doc_info(config.doc_info.clone());
        server.strict_docs(config.strict_docs);
        if let Some(cors) = &config.cors {
            server.allow_cors_with(cors);
        }
        if let Some(swagger) = &config.swagger {
            server.swagger(&swagger.pattern, swagger.path.clone());
        }
        server
    }

    /// Registry the Swagger renderer is published into.
    pub fn registry(&self) -> &Arc<DocRegistry> {
        &self.registry
    }

    pub const fn doc_info(&self) -> &DocInfo {
        &self.doc_info
    }

    /// Metadata used by subsequent [`swagger`](Self::swagger) calls.
    pub fn set_doc_info(&mut self, info: DocInfo) -> &mut Self {
        self.doc_info = info;
        self
    }

    /// Serve template failures as HTTP errors instead of raw file content.
    /// Applies to subsequent [`swagger`](Self::swagger) calls.
    pub const fn strict_docs(&mut self, strict: bool) -> &mut Self {
        self.strict_docs = strict;
        self
    }

    verb!(
        /// Route `pattern` for GET requests to `handler`.
        get
    );
    verb!(
        /// Route `pattern` for POST requests to `handler`.
        post
    );
    verb!(
        /// Route `pattern` for PUT requests to `handler`.
        put
    );
    verb!(
        /// Route `pattern` for PATCH requests to `handler`.
        patch
    );
    verb!(
        /// Route `pattern` for DELETE requests to `handler`.
        delete
    );
    verb!(
        /// Route `pattern` for HEAD requests to `handler`.
        head
    );
    verb!(
        /// Route `pattern` for OPTIONS requests to `handler`.
        options
    );
    verb!(
        /// Route `pattern` for CONNECT requests to `handler`.
        connect
    );
    verb!(
        /// Route `pattern` for TRACE requests to `handler`.
        trace
    );

    /// Route `pattern` to an arbitrary method router.
    ///
    /// Routes added for the same pattern are merged.
    ///
    /// # Panics
    ///
    /// As [`Router::route`]: if the same method is routed twice for one
    /// pattern, or the pattern is invalid.
    pub fn add(&mut self, pattern: &str, method_router: MethodRouter) -> &mut Self {
        debug!(pattern, "Registering route");
        let router = std::mem::take(&mut self.router);
        self.router = router.route(pattern, method_router);
        self
    }

    /// Build a subrouter with `build` and mount it at `pattern`.
    ///
    /// The subrouter shares this server's doc registry and doc info; its
    /// middleware applies to its own routes only.
    pub fn route<F>(&mut self, pattern: &str, build: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let mut sub = Self::with_registry(Arc::clone(&self.registry));
        sub.doc_info = self.doc_info.clone();
        sub.strict_docs = self.strict_docs;
        build(&mut sub);
        self.mount(pattern, sub.into_router())
    }

    /// Mount a prebuilt router at `pattern`. `/` and the empty pattern merge
    /// instead of nesting.
    pub fn mount(&mut self, pattern: &str, router: Router) -> &mut Self {
        let prefix = pattern.trim_end_matches('/');
        let current = std::mem::take(&mut self.router);
        self.router = if prefix.is_empty() {
            current.merge(router)
        } else {
            current.nest(prefix, router)
        };
        self
    }

    /// Make `value` available to every handler under `key`.
    ///
    /// Handlers read it through `Extension<ContextValues>`.
    pub fn with_value<V>(&mut self, key: impl Into<String>, value: V) -> &mut Self
    where
        V: std::any::Any + Send + Sync,
    {
        self.values.insert(key, value);
        self
    }

    /// Allow cross-origin requests from any origin.
    pub fn allow_cors(&mut self) -> &mut Self {
        self.allow_cors_with(&CorsConfig::AllowAll)
    }

    pub fn allow_cors_with(&mut self, config: &CorsConfig) -> &mut Self {
        self.cors = Some(build_cors_layer(config));
        self
    }

    /// Serve the spec file at `path` with the Swagger UI under `pattern`.
    ///
    /// The renderer is published as [`SWAGGER_DOC_NAME`] in the registry,
    /// replacing any earlier one. A trailing `/*` on `pattern` is ignored.
    /// Calling this again for a mounted prefix only swaps the document.
    pub fn swagger(&mut self, pattern: &str, path: impl Into<PathBuf>) -> &mut Self {
        let doc = SwaggerDoc::new(path, self.doc_info.clone()).with_strict(self.strict_docs);
        info!(
            pattern,
            path = %doc.path().display(),
            strict = doc.is_strict(),
            "Serving swagger doc"
        );
        self.registry.replace(SWAGGER_DOC_NAME, Arc::new(doc));

        let prefix = swagger_prefix(pattern);
        if !self.docs_mounts.insert(prefix.clone()) {
            return self;
        }
        let docs = docs_router(
            Arc::clone(&self.registry),
            SWAGGER_DOC_NAME,
            &prefix,
            SwaggerUiConfig::default(),
        );
        self.mount(&prefix, docs)
    }

    /// Materialise the router with this server's middleware applied.
    pub fn into_router(self) -> Router {
        let mut router = self.router;
        if !self.values.is_empty() {
            let values = self.values;
            router = router.layer(middleware::from_fn(move |req: Request, next: Next| {
                inject_values(values.clone(), req, next)
            }));
        }
        if let Some(cors) = self.cors {
            router = router.layer(cors);
        }
        router
    }

    /// Bind `0.0.0.0:port` and serve in the background.
    pub async fn listen(self, port: u16) -> Result<ServerHandle, HttpError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| HttpError::Bind { addr, source })?;
        self.listen_on(listener)
    }

    /// Serve on a pre-bound listener in the background.
    pub fn listen_on(self, listener: TcpListener) -> Result<ServerHandle, HttpError> {
        let addr = listener
            .local_addr()
            .map_err(|e| HttpError::Internal(format!("listener has no local address: {e}")))?;
        let app = self.into_router().layer(TraceLayer::new_for_http());

        let cancel = CancellationToken::new();
        let shutdown = cancel.clone();
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
            {
                error!(%addr, error = %e, "HTTP server error");
            }
        });

        info!(%addr, "HTTP server started on port {}", addr.port());
        Ok(ServerHandle::new(addr, cancel, task))
    }
}

impl From<Server> for Router {
    fn from(server: Server) -> Self {
        server.into_router()
    }
}

/// `/swagger/*` → `/swagger`, `/` → ``.
fn swagger_prefix(pattern: &str) -> String {
    pattern
        .trim_end_matches('*')
        .trim_end_matches('/')
        .to_string()
}
