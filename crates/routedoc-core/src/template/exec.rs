//! Template evaluation.

use std::fmt::Write as _;

use serde_json::Value;

use super::parse::{Command, Node, Operand, Pipeline};
use super::{FuncMap, TemplateError};

pub(crate) fn execute(
    name: &str,
    nodes: &[Node],
    funcs: &FuncMap,
    dot: &Value,
    out: &mut String,
) -> Result<(), TemplateError> {
    let state = State { name, funcs, dot };
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Action(pipeline) => {
                let value = state
                    .pipeline(pipeline)
                    .map_err(|message| state.error(pipeline.line, message))?;
                print_value(&value, out);
            }
        }
    }
    Ok(())
}

struct State<'a> {
    name: &'a str,
    funcs: &'a FuncMap,
    dot: &'a Value,
}

impl State<'_> {
    fn error(&self, line: usize, message: String) -> TemplateError {
        TemplateError::Exec {
            name: self.name.to_string(),
            line,
            message,
        }
    }

    fn pipeline(&self, pipeline: &Pipeline) -> Result<Value, String> {
        let mut piped: Option<Value> = None;
        for command in &pipeline.commands {
            piped = Some(self.command(command, piped.take())?);
        }
        Ok(piped.unwrap_or(Value::Null))
    }

    fn command(&self, command: &Command, piped: Option<Value>) -> Result<Value, String> {
        match command {
            Command::Operand(operand) => self.operand(operand),
            Command::Call { func, args } => {
                let mut values = args
                    .iter()
                    .map(|arg| self.operand(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                values.extend(piped);
                self.call(func, &values)
            }
        }
    }

    fn operand(&self, operand: &Operand) -> Result<Value, String> {
        match operand {
            Operand::Dot => Ok(self.dot.clone()),
            Operand::Field(path) => lookup(self.dot, path).cloned(),
            Operand::Str(s) => Ok(Value::String(s.clone())),
            Operand::Int(n) => Ok(Value::from(*n)),
            Operand::Bool(b) => Ok(Value::Bool(*b)),
            Operand::Call(func) => self.call(func, &[]),
        }
    }

    fn call(&self, func: &str, args: &[Value]) -> Result<Value, String> {
        let f = self
            .funcs
            .get(func)
            .ok_or_else(|| format!("{func:?} is not a defined function"))?;
        f(args).map_err(|e| format!("error calling {func}: {e}"))
    }
}

fn lookup<'v>(dot: &'v Value, path: &[String]) -> Result<&'v Value, String> {
    let mut current = dot;
    for (depth, field) in path.iter().enumerate() {
        let at = format!(".{}", path[..=depth].join("."));
        current = match current {
            Value::Object(map) => map
                .get(field)
                .ok_or_else(|| format!("at <{at}>: can't evaluate field {field}"))?,
            other => {
                return Err(format!(
                    "at <{at}>: can't evaluate field {field} in type {}",
                    kind(other)
                ));
            }
        };
    }
    Ok(current)
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "slice",
        Value::Object(_) => "map",
    }
}

/// Print a value the way Go's `fmt.Print` formats the equivalent Go value.
fn print_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("<no value>"),
        Value::String(s) => out.push_str(s),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                print_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push_str("map[");
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(key);
                out.push(':');
                print_value(item, out);
            }
            out.push(']');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_reports_the_failing_path() {
        let data = json!({ "Info": { "Title": "x" } });
        assert_eq!(lookup(&data, &["Info".into(), "Title".into()]).unwrap(), "x");

        let err = lookup(&data, &["Info".into(), "Missing".into()]).unwrap_err();
        assert_eq!(err, "at <.Info.Missing>: can't evaluate field Missing");

        let err = lookup(&data, &["Info".into(), "Title".into(), "Len".into()]).unwrap_err();
        assert_eq!(err, "at <.Info.Title.Len>: can't evaluate field Len in type string");
    }

    #[test]
    fn nested_collections_print_recursively() {
        let mut out = String::new();
        print_value(&json!([[1, 2], { "k": [true] }]), &mut out);
        assert_eq!(out, "[[1 2] map[k:[true]]]");
    }
}
