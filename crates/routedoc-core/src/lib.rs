//! Core types for routedoc.
//!
//! This crate holds everything that does not need an HTTP stack:
//!
//! - [`DocInfo`], the metadata record substituted into API documents
//! - [`template`], a small Go-style `{{ .Field }}` template engine
//! - [`SwaggerDoc`], the renderer that loads and substitutes a spec file
//! - [`DocRegistry`], the scoped name → [`DocProvider`] lookup used by
//!   HTTP adapters to serve documents without knowing their concrete type

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod services;
pub mod template;

pub use domain::DocInfo;
pub use ports::{DocError, DocProvider, RegistryError};
pub use services::{DEFAULT_DOC_PATH, DocRegistry, SWAGGER_DOC_NAME, SwaggerDoc};
pub use template::{FuncMap, Template, TemplateError};
