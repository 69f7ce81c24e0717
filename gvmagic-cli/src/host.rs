//! A file-backed notebook host for `gvmagic cell`.
//!
//! Variables come from a JSON object. Evaluating an expression yields:
//!
//! | Expression / JSON value          | `Value`                          |
//! |----------------------------------|----------------------------------|
//! | JSON literal or variable name    | converted as below               |
//! | string                           | `Str`                            |
//! | array                            | `Sequence`                       |
//! | object with string `to_dot`      | `Object` implementing `to_dot()` |
//! | object with non-string `to_dot`  | `Object` whose `to_dot()` needs arguments |
//! | other object                     | `Object` without the capability  |
//! | number, bool, null               | `Other`                          |

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{Map, Value as Json};

use gvmagic_core::SvgImage;
use gvmagic_magic::{CallError, EvalError, Host, HostObject, ToDot, Value};

/// Where displayed images go.
#[derive(Debug, Clone)]
pub enum SvgSink {
    /// Engine bytes as-is, consecutive images separated by one `\n`.
    Stdout,
    /// `<dir>/<stem>-<n>.svg`, `n` counting from 1.
    Dir { dir: PathBuf, stem: String },
}

pub struct JsonHost {
    scope: Map<String, Json>,
    sink: SvgSink,
    displayed: usize,
    errors: usize,
}

impl JsonHost {
    pub fn new(scope: Map<String, Json>, sink: SvgSink) -> Self {
        Self {
            scope,
            sink,
            displayed: 0,
            errors: 0,
        }
    }

    pub fn load_scope(path: &Path) -> Result<Map<String, Json>> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read scope '{}'", path.display()))?;
        match serde_json::from_str::<Json>(&raw)
            .with_context(|| format!("failed to parse scope '{}'", path.display()))?
        {
            Json::Object(map) => Ok(map),
            other => anyhow::bail!(
                "scope '{}' must be a JSON object, found {}",
                path.display(),
                json_type(&other)
            ),
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    fn write_svg(&mut self, image: &SvgImage) -> std::io::Result<()> {
        match &self.sink {
            SvgSink::Stdout => {
                let mut stdout = std::io::stdout().lock();
                if self.displayed > 0 {
                    stdout.write_all(b"\n")?;
                }
                stdout.write_all(image.as_bytes())?;
                stdout.flush()
            }
            SvgSink::Dir { dir, stem } => {
                let path = dir.join(format!("{stem}-{}.svg", self.displayed + 1));
                std::fs::write(&path, image.as_bytes())?;
                println!("✓ wrote {}", path.display());
                Ok(())
            }
        }
    }
}

impl Host for JsonHost {
    fn evaluate(&self, expr: &str) -> Result<Value, EvalError> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(EvalError::Invalid {
                expr: expr.to_owned(),
                message: "empty expression".to_owned(),
            });
        }

        if is_identifier(expr) {
            // Bare `true`/`false`/`null` are JSON literals unless shadowed.
            if let Some(value) = self.scope.get(expr) {
                return Ok(to_value(value));
            }
        }

        match serde_json::from_str::<Json>(expr) {
            Ok(literal) => Ok(to_value(&literal)),
            Err(_) if is_identifier(expr) => Err(EvalError::Undefined(expr.to_owned())),
            Err(err) => Err(EvalError::Invalid {
                expr: expr.to_owned(),
                message: err.to_string(),
            }),
        }
    }

    fn display_svg(&mut self, image: &SvgImage) {
        match self.write_svg(image) {
            Ok(()) => self.displayed += 1,
            Err(err) => {
                tracing::warn!(error = %err, "failed to display image");
                self.error(&format!("cannot display image: {err}"));
            }
        }
    }

    fn info(&mut self, message: &str) {
        println!("{message}");
    }

    fn error(&mut self, message: &str) {
        self.errors += 1;
        eprintln!("{}", message.red());
    }
}

// ---------------------------------------------------------------------------
// JSON → Value
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct JsonObject(Map<String, Json>);

impl HostObject for JsonObject {
    fn type_name(&self) -> &str {
        "object"
    }

    fn as_to_dot(&self) -> Option<&dyn ToDot> {
        self.0.contains_key("to_dot").then_some(self as &dyn ToDot)
    }
}

impl ToDot for JsonObject {
    fn to_dot(&self) -> Result<String, CallError> {
        match self.0.get("to_dot") {
            Some(Json::String(dot)) => Ok(dot.clone()),
            _ => Err(CallError::RequiresArguments),
        }
    }
}

fn to_value(json: &Json) -> Value {
    match json {
        Json::String(s) => Value::Str(s.clone()),
        Json::Array(items) => Value::Sequence(items.iter().map(to_value).collect()),
        Json::Object(map) => Value::Object(Box::new(JsonObject(map.clone()))),
        other => Value::Other(json_type(other).to_owned()),
    }
}

fn json_type(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn is_identifier(expr: &str) -> bool {
    let mut chars = expr.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
