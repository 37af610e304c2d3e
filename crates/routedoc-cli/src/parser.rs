//! Main CLI parser.

use std::path::PathBuf;

use clap::Parser;
use routedoc_axum::{DEFAULT_PORT, DEFAULT_SWAGGER_PATTERN, ServerConfig};
use routedoc_core::{DEFAULT_DOC_PATH, DocInfo};

/// Serve an API description file with a Swagger UI.
#[derive(Debug, Parser)]
#[command(name = "routedoc")]
#[command(about = "Serve a Swagger/OpenAPI spec file with substituted metadata")]
#[command(version)]
pub struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "ROUTEDOC_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Spec file containing `{{.Field}}` placeholders
    #[arg(short, long, env = "ROUTEDOC_SPEC", default_value = DEFAULT_DOC_PATH)]
    pub spec: PathBuf,

    /// Route prefix for the Swagger UI and doc.json
    #[arg(long, env = "ROUTEDOC_SWAGGER_PATH", default_value = DEFAULT_SWAGGER_PATTERN)]
    pub swagger_path: String,

    /// API title
    #[arg(long, env = "ROUTEDOC_TITLE", default_value = "")]
    pub title: String,

    /// API version
    #[arg(long = "version-string", env = "ROUTEDOC_VERSION", default_value = "")]
    pub version_string: String,

    /// Host the API is served from
    #[arg(long, env = "ROUTEDOC_HOST", default_value = "")]
    pub host: String,

    /// Base path of the API
    #[arg(long, env = "ROUTEDOC_BASE_PATH", default_value = "")]
    pub base_path: String,

    /// Transfer protocol; repeat for several
    #[arg(long = "scheme")]
    pub schemes: Vec<String>,

    /// API description; newlines are escaped when rendered
    #[arg(long, env = "ROUTEDOC_DESCRIPTION", default_value = "")]
    pub description: String,

    /// Allow cross-origin requests from any origin
    #[arg(long)]
    pub cors: bool,

    /// Serve template errors as HTTP 500 instead of the raw file
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    pub fn doc_info(&self) -> DocInfo {
        DocInfo::new()
            .with_title(self.title.clone())
            .with_version(self.version_string.clone())
            .with_host(self.host.clone())
            .with_base_path(self.base_path.clone())
            .with_schemes(self.schemes.iter().cloned())
            .with_description(self.description.clone())
    }

    /// Server configuration described by these arguments.
    pub fn server_config(&self) -> ServerConfig {
        let mut config = ServerConfig::with_defaults()
            .with_port(self.port)
            .with_swagger(self.swagger_path.clone(), self.spec.clone())
            .with_doc_info(self.doc_info())
            .with_strict_docs(self.strict);
        if self.cors {
            config = config.with_cors();
        }
        config
    }

    /// Default tracing filter directive.
    pub const fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
