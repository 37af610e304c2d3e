//! Document renderers and the provider registry.

mod registry;
mod swagger;

pub use registry::DocRegistry;
pub use swagger::{DEFAULT_DOC_PATH, SWAGGER_DOC_NAME, SwaggerDoc};
