//! Command-line front end for routedoc.
//!
//! The binary serves a single spec file through the Swagger UI, with the
//! document metadata taken from flags or `ROUTEDOC_*` environment variables.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs binary
use anyhow as _;
use dotenvy as _;
use tokio as _;
use tracing as _;
use tracing_subscriber as _;

pub mod parser;

pub use parser::Cli;
