//! Middleware attached by [`Server`](crate::Server).
//!
//! - value injection: string-keyed values placed in request extensions
//! - CORS: built from [`CorsConfig`]

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Methods allowed by the permissive CORS policy.
pub const CORS_ALLOWED_METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
    Method::PATCH,
    Method::CONNECT,
    Method::HEAD,
    Method::TRACE,
];

/// Request headers allowed by the permissive CORS policy.
pub const CORS_ALLOWED_HEADERS: [HeaderName; 6] = [
    header::ACCEPT,
    header::ACCEPT_ENCODING,
    header::AUTHORIZATION,
    header::CONTENT_LENGTH,
    header::CONTENT_TYPE,
    HeaderName::from_static("x-csrf-token"),
];

/// Build CORS layer from configuration.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(CORS_ALLOWED_METHODS.to_vec())
        .allow_headers(CORS_ALLOWED_HEADERS.to_vec());

    match config {
        CorsConfig::AllowAll => layer.allow_origin(AnyOrigin),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            layer.allow_origin(allowed)
        }
    }
}

type SharedValue = Arc<dyn Any + Send + Sync>;

/// Values injected into every request by [`Server::with_value`](crate::Server::with_value).
///
/// Extract with `Extension<ContextValues>`:
///
/// ```ignore
/// async fn handler(Extension(values): Extension<ContextValues>) -> String {
///     values.get::<String>("tenant").cloned().unwrap_or_default()
/// }
/// ```
#[derive(Clone, Default)]
pub struct ContextValues {
    values: Arc<HashMap<String, SharedValue>>,
}

impl ContextValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn insert<V>(&mut self, key: impl Into<String>, value: V)
    where
        V: Any + Send + Sync,
    {
        Arc::make_mut(&mut self.values).insert(key.into(), Arc::new(value));
    }

    /// Value under `key`, if present and of type `V`.
    pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
        self.values.get(key)?.downcast_ref::<V>()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `self` with `inner` layered on top; keys in `inner` win.
    #[must_use]
    pub fn merged_with(&self, inner: &Self) -> Self {
        if self.is_empty() {
            return inner.clone();
        }
        let mut values = (*self.values).clone();
        values.extend(inner.values.iter().map(|(k, v)| (k.clone(), Arc::clone(v))));
        Self {
            values: Arc::new(values),
        }
    }
}

impl fmt::Debug for ContextValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("ContextValues").field("keys", &keys).finish()
    }
}

/// Merge `values` into the request's [`ContextValues`] extension.
///
/// Values set by an enclosing router are kept; on key clashes the innermost
/// router wins.
pub(crate) async fn inject_values(values: ContextValues, mut req: Request, next: Next) -> Response {
    let merged = match req.extensions_mut().remove::<ContextValues>() {
        Some(outer) => outer.merged_with(&values),
        None => values,
    };
    req.extensions_mut().insert(merged);
    next.run(req).await
}
