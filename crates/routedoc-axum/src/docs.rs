//! Documentation endpoints.
//!
//! [`docs_router`] serves three routes relative to its mount point:
//!
//! - `/` redirects to `index.html`
//! - `/index.html` is the Swagger UI page
//! - `/doc.json` is the document produced by the registered provider
//!
//! The provider is looked up by name in a [`DocRegistry`] on every request,
//! so handlers never see the concrete renderer type.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use routedoc_core::template::marshal;
use routedoc_core::{DocRegistry, FuncMap, Template};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::HttpError;

/// Settings for the Swagger UI page.
#[derive(Debug, Clone, Serialize)]
pub struct SwaggerUiConfig {
    /// Document URL, relative to the UI page.
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "DeepLinking")]
    pub deep_linking: bool,
    /// Id of the element the UI mounts into.
    #[serde(rename = "DomID")]
    pub dom_id: String,
}

impl Default for SwaggerUiConfig {
    fn default() -> Self {
        Self {
            url: "doc.json".to_string(),
            deep_linking: true,
            dom_id: "swagger-ui".to_string(),
        }
    }
}

const INDEX_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Swagger UI</title>
  <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
  <style>
    html { box-sizing: border-box; overflow-y: scroll; }
    *, *:before, *:after { box-sizing: inherit; }
    body { margin: 0; background: #fafafa; }
  </style>
</head>
<body>
<div id="{{.DomID}}"></div>
<script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" charset="UTF-8"></script>
<script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js" charset="UTF-8"></script>
<script>
window.onload = function() {
  window.ui = SwaggerUIBundle({
    url: {{marshal .URL}},
    dom_id: "#{{.DomID}}",
    deepLinking: {{.DeepLinking}},
    presets: [
      SwaggerUIBundle.presets.apis,
      SwaggerUIStandalonePreset
    ],
    plugins: [
      SwaggerUIBundle.plugins.DownloadUrl
    ],
    layout: "StandaloneLayout"
  });
};
</script>
</body>
</html>
"##;

/// Render the Swagger UI page.
pub fn render_index(config: &SwaggerUiConfig) -> Result<String, HttpError> {
    let template = Template::parse("index", INDEX_TEMPLATE, ui_funcs())?;
    Ok(template.render(config)?)
}

fn ui_funcs() -> FuncMap {
    FuncMap::new().with("marshal", marshal)
}

#[derive(Clone)]
struct DocsState {
    registry: Arc<DocRegistry>,
    name: Arc<str>,
    ui: Arc<SwaggerUiConfig>,
    index_path: Arc<str>,
}

/// Routes serving the provider registered as `name`, for mounting at `prefix`.
///
/// `prefix` is only used to build the absolute redirect to `index.html`.
pub fn docs_router(
    registry: Arc<DocRegistry>,
    name: &str,
    prefix: &str,
    ui: SwaggerUiConfig,
) -> Router {
    let state = DocsState {
        registry,
        name: Arc::from(name),
        ui: Arc::new(ui),
        index_path: Arc::from(format!("{prefix}/index.html")),
    };

    Router::new()
        .route("/", get(redirect_to_index))
        .route("/index.html", get(swagger_ui))
        .route("/doc.json", get(doc_json))
        .with_state(state)
}

async fn redirect_to_index(State(state): State<DocsState>) -> Redirect {
    Redirect::permanent(&state.index_path)
}

async fn swagger_ui(State(state): State<DocsState>) -> Result<Html<String>, HttpError> {
    render_index(&state.ui).map(Html)
}

/// Serve the named document.
///
/// Lenient providers always answer 200, even when the body is an error
/// message or an unrendered template.
async fn doc_json(State(state): State<DocsState>) -> Response {
    debug!(doc = %state.name, "Serving API document");
    match state.registry.read_doc_bytes(&state.name) {
        Ok(doc) => (
            [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
            doc,
        )
            .into_response(),
        Err(e) => {
            warn!(doc = %state.name, error = %e, "Failed to serve API document");
            HttpError::from(e).into_response()
        }
    }
}
