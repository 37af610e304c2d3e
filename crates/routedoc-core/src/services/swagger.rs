//! Swagger document renderer.
//!
//! Loads a YAML or JSON spec file, substitutes `{{.Field}}` placeholders from a
//! [`DocInfo`] and returns the text. The file is re-read on every call; doc
//! serving is not a hot path.
//!
//! By default rendering never fails: an unreadable file yields the error
//! message as the document, and a template that does not parse or execute is
//! served verbatim. [`SwaggerDoc::try_render`] exposes the same pipeline with
//! errors surfaced, and [`SwaggerDoc::with_strict`] makes the provider use it.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::DocInfo;
use crate::ports::{DocError, DocProvider};
use crate::template::{FuncMap, Template, marshal};

/// Registry name the Swagger renderer is published under.
pub const SWAGGER_DOC_NAME: &str = "swagger";

const TEMPLATE_NAME: &str = "swagger_info";

/// Default location of the spec file.
pub const DEFAULT_DOC_PATH: &str = "docs/swagger.yaml";

/// Renders a spec file against a [`DocInfo`].
#[derive(Debug, Clone)]
pub struct SwaggerDoc {
    path: PathBuf,
    info: DocInfo,
    strict: bool,
}

impl Default for SwaggerDoc {
    fn default() -> Self {
        Self::new(DEFAULT_DOC_PATH, DocInfo::default())
    }
}

impl SwaggerDoc {
    pub fn new(path: impl Into<PathBuf>, info: DocInfo) -> Self {
        Self {
            path: path.into(),
            info,
            strict: false,
        }
    }

    /// Surface read and template errors from [`DocProvider::read_doc`]
    /// instead of degrading to error text or raw content.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point at a different spec file. Not validated until the next render.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
    }

    pub const fn info(&self) -> &DocInfo {
        &self.info
    }

    pub const fn info_mut(&mut self) -> &mut DocInfo {
        &mut self.info
    }

    pub fn set_info(&mut self, info: DocInfo) {
        self.info = info;
    }

    /// Render the document, never failing.
    ///
    /// - unreadable file: the read error message
    /// - non-UTF-8 content, template parse or execution failure: the file
    ///   content, unmodified
    /// - otherwise: the substituted document
    pub fn render_bytes(&self) -> Vec<u8> {
        let bytes = match self.load() {
            Ok(bytes) => bytes,
            Err(e) => return e.to_string().into_bytes(),
        };

        let rendered = self.decode(&bytes).and_then(|source| self.substitute(source));
        match rendered {
            Ok(rendered) => rendered.into_bytes(),
            Err(e) => {
                debug!(
                    path = %self.path.display(),
                    error = %e,
                    "Serving swagger doc without substitution"
                );
                bytes
            }
        }
    }

    /// [`render_bytes`](Self::render_bytes) as text. Non-UTF-8 fallback
    /// content is decoded lossily.
    pub fn render(&self) -> String {
        match String::from_utf8(self.render_bytes()) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    /// Render the document, surfacing every failure.
    pub fn try_render(&self) -> Result<String, DocError> {
        let bytes = self.load()?;
        self.substitute(self.decode(&bytes)?)
    }

    fn load(&self) -> Result<Vec<u8>, DocError> {
        fs::read(&self.path).map_err(|source| DocError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn decode<'b>(&self, bytes: &'b [u8]) -> Result<&'b str, DocError> {
        std::str::from_utf8(bytes).map_err(|source| DocError::Encoding {
            path: self.path.clone(),
            source,
        })
    }

    fn substitute(&self, source: &str) -> Result<String, DocError> {
        let template = Template::parse(TEMPLATE_NAME, source, doc_funcs())?;
        Ok(template.render(&self.info.escaped())?)
    }
}

impl DocProvider for SwaggerDoc {
    fn read_doc(&self) -> Result<String, DocError> {
        if self.strict {
            self.try_render()
        } else {
            Ok(self.render())
        }
    }

    fn read_doc_bytes(&self) -> Result<Vec<u8>, DocError> {
        if self.strict {
            self.try_render().map(String::into_bytes)
        } else {
            Ok(self.render_bytes())
        }
    }
}

/// Functions available to spec templates.
fn doc_funcs() -> FuncMap {
    FuncMap::new().with("marshal", marshal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn spec_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_points_at_docs_dir() {
        let doc = SwaggerDoc::default();
        assert_eq!(doc.path(), Path::new(DEFAULT_DOC_PATH));
        assert!(!doc.is_strict());
    }

    #[test]
    fn setters_take_effect_on_next_render() {
        let first = spec_file("first {{.Title}}");
        let second = spec_file("second {{.Title}}");

        let mut doc = SwaggerDoc::new(first.path(), DocInfo::new().with_title("A"));
        assert_eq!(doc.render(), "first A");

        doc.set_path(second.path());
        doc.info_mut().title = "B".to_string();
        assert_eq!(doc.render(), "second B");

        doc.set_info(DocInfo::new().with_title("C"));
        assert_eq!(doc.render(), "second C");
    }

    #[test]
    fn strict_provider_surfaces_template_errors() {
        let file = spec_file("{{.Nope}}");
        let lenient = SwaggerDoc::new(file.path(), DocInfo::default());
        let strict = lenient.clone().with_strict(true);

        assert_eq!(lenient.read_doc().unwrap(), "{{.Nope}}");
        assert!(matches!(strict.read_doc(), Err(DocError::Template(_))));
    }

    #[test]
    fn strict_provider_surfaces_read_errors() {
        let strict = SwaggerDoc::new("/definitely/not/here.yaml", DocInfo::default()).with_strict(true);
        assert!(matches!(strict.read_doc(), Err(DocError::Read { .. })));
    }

    #[test]
    fn invalid_utf8_is_served_unmodified() {
        let raw = b"title: {{.Title}} \xff";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(raw).unwrap();
        let doc = SwaggerDoc::new(file.path(), DocInfo::new().with_title("T"));

        assert_eq!(doc.render_bytes(), raw.to_vec());
        assert_eq!(doc.read_doc_bytes().unwrap(), raw.to_vec());
        assert_eq!(doc.render(), "title: {{.Title}} \u{fffd}");

        let strict = doc.with_strict(true);
        assert!(matches!(strict.read_doc_bytes(), Err(DocError::Encoding { .. })));
    }
}
