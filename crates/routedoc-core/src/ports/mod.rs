//! Port definitions for document providers.
//!
//! HTTP adapters depend on [`DocProvider`] only; concrete renderers live in
//! [`crate::services`].

use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use thiserror::Error;

use crate::template::TemplateError;

/// A source of API documentation text.
///
/// Implementations are looked up by name through
/// [`DocRegistry`](crate::DocRegistry) so the serving handler never needs the
/// concrete type.
pub trait DocProvider: Send + Sync {
    /// Produce the document.
    ///
    /// Lenient providers always return `Ok`, folding failures into the
    /// returned text. Strict providers surface them as [`DocError`].
    fn read_doc(&self) -> Result<String, DocError>;

    /// Produce the document as bytes.
    ///
    /// Providers whose fallback content may not be UTF-8 override this to
    /// hand it out unmodified.
    fn read_doc_bytes(&self) -> Result<Vec<u8>, DocError> {
        self.read_doc().map(String::into_bytes)
    }
}

/// Errors produced while loading or rendering a document.
#[derive(Debug, Error)]
pub enum DocError {
    /// The source file could not be read.
    #[error("open {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source file is not UTF-8 text, so it cannot be templated.
    #[error("{}: not valid UTF-8: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: Utf8Error,
    },

    /// The source file is not a valid template, or failed to execute.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Errors from [`DocRegistry`](crate::DocRegistry) operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A provider already exists under this name.
    #[error("doc provider {0:?} is already registered")]
    AlreadyRegistered(String),

    /// No provider exists under this name.
    #[error("no doc provider registered under {0:?}")]
    NotRegistered(String),

    /// The provider itself failed.
    #[error(transparent)]
    Doc(#[from] DocError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_the_path() {
        let err = DocError::Read {
            path: PathBuf::from("docs/missing.yaml"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "open docs/missing.yaml: gone");
    }

    #[test]
    fn read_error_with_empty_path() {
        let err = DocError::Read {
            path: PathBuf::new(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "open : gone");
    }
}
