//! Go-style text templates.
//!
//! Supports the subset of Go's `text/template` that API description files
//! use in practice:
//!
//! - `{{.Field}}` and nested `{{.Field.Sub}}` lookups, `{{.}}` for the data
//! - function calls with operand arguments: `{{marshal .Schemes}}`
//! - pipelines: `{{.Schemes | marshal}}`
//! - string, integer and boolean literals
//! - comments `{{/* ... */}}` and trim markers `{{- ... -}}`
//!
//! Data is any [`Serialize`] value; it is converted to a
//! [`serde_json::Value`] once per render. Output is never HTML-escaped.
//!
//! ```
//! use routedoc_core::template::{FuncMap, Template};
//! use serde_json::json;
//!
//! let tpl = Template::parse("greeting", "Hello {{.Name}}!", FuncMap::new()).unwrap();
//! assert_eq!(tpl.render(&json!({ "Name": "World" })).unwrap(), "Hello World!");
//! ```

mod exec;
mod parse;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use parse::Node;

/// A template function: receives evaluated arguments, returns a value or a
/// message describing why it could not.
pub type Func = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

/// Named functions available to a template.
///
/// Function names are resolved when the template is parsed.
#[derive(Clone, Default)]
pub struct FuncMap {
    funcs: BTreeMap<String, Func>,
}

impl FuncMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `func` under `name`, replacing any previous entry.
    pub fn insert<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.funcs.insert(name.into(), Arc::new(func));
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.insert(name, func);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Func> {
        self.funcs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }
}

impl fmt::Debug for FuncMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.funcs.keys()).finish()
    }
}

/// JSON-encode a single argument: `{{marshal .Schemes}}` → `["http","https"]`.
pub fn marshal(args: &[Value]) -> Result<Value, String> {
    match args {
        [value] => serde_json::to_string(value)
            .map(Value::String)
            .map_err(|e| e.to_string()),
        _ => Err(format!(
            "wrong number of args for marshal: want 1 got {}",
            args.len()
        )),
    }
}

/// Template parse and execution errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Malformed action syntax, or a reference to an unknown function.
    #[error("template: {name}:{line}: {message}")]
    Parse {
        name: String,
        line: usize,
        message: String,
    },

    /// A lookup or function call failed while rendering.
    #[error("template: {name}:{line}: executing {name:?}: {message}")]
    Exec {
        name: String,
        line: usize,
        message: String,
    },

    /// The data could not be converted to a JSON value.
    #[error("template data: {0}")]
    Data(#[from] serde_json::Error),
}

impl TemplateError {
    /// True for errors raised while parsing, as opposed to rendering.
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// A parsed template, ready to render any number of times.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
    funcs: FuncMap,
}

impl Template {
    /// Parse `source`, resolving function names against `funcs`.
    pub fn parse(
        name: impl Into<String>,
        source: &str,
        funcs: FuncMap,
    ) -> Result<Self, TemplateError> {
        let name = name.into();
        let nodes = parse::parse(&name, source, &funcs)?;
        Ok(Self { name, nodes, funcs })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render against `data` into a new string.
    pub fn render<T: Serialize + ?Sized>(&self, data: &T) -> Result<String, TemplateError> {
        let mut out = String::new();
        self.execute(data, &mut out)?;
        Ok(out)
    }

    /// Render against `data`, appending to `out`.
    ///
    /// On error `out` may hold partial output.
    pub fn execute<T: Serialize + ?Sized>(
        &self,
        data: &T,
        out: &mut String,
    ) -> Result<(), TemplateError> {
        let dot = serde_json::to_value(data)?;
        exec::execute(&self.name, &self.nodes, &self.funcs, &dot, out)
    }
}
