//! API document metadata.

use serde::{Deserialize, Serialize};

/// Metadata substituted into a Swagger/OpenAPI source document.
///
/// Templates address the fields by their PascalCase names
/// (`{{.Title}}`, `{{.BasePath}}`, `{{marshal .Schemes}}`, ...), which is
/// how the record serializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DocInfo {
    /// API version string, e.g. `1.0.0`.
    pub version: String,
    /// Host (and optional port) serving the API.
    pub host: String,
    /// Base path prefixed to every operation.
    pub base_path: String,
    /// Transfer protocols, in order of preference.
    pub schemes: Vec<String>,
    /// Human-readable API title.
    pub title: String,
    /// Free-form description. May contain newlines.
    pub description: String,
}

impl DocInfo {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Replace the scheme list.
    #[must_use]
    pub fn with_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Copy of this record that is safe to embed in a single-line JSON string.
    ///
    /// Raw newlines in `description` become the two-character sequence `\n`.
    /// Other fields are copied unchanged.
    #[must_use]
    pub fn escaped(&self) -> Self {
        Self {
            description: self.description.replace('\n', "\\n"),
            ..self.clone()
        }
    }
}
