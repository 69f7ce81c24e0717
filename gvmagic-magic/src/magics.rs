//! [`GraphvizMagics`] — the four entry points and cell dispatch.
//!
//! | Magic              | Text source                                   |
//! |--------------------|-----------------------------------------------|
//! | `%dot` / `%%dot`   | the invocation line, plus the cell body       |
//! | `%dotstr expr`     | `expr` evaluated to a string                  |
//! | `%dotobj expr`     | `expr` evaluated to an object, `to_dot()`     |
//! | `%dotobjs expr`    | `expr` evaluated to a sequence, each `to_dot()` |
//!
//! Every method reports failures through [`Host::error`] and returns the
//! number of images it displayed; nothing is returned as `Err`. Empty output
//! from a successful render is not displayed.

use gvmagic_core::{SvgImage, SvgRenderer};

use crate::cell::{parse_cell, Invocation};
use crate::error::{CapabilityError, MagicError};
use crate::host::{Host, Value};

pub struct GraphvizMagics<R> {
    renderer: R,
}

impl<R: SvgRenderer> GraphvizMagics<R> {
    /// Magic names a host registers when the extension is loaded.
    pub const NAMES: [&'static str; 4] = ["dot", "dotstr", "dotobj", "dotobjs"];

    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Only `dot` accepts a cell body.
    pub fn is_cell_magic(name: &str) -> bool {
        name == "dot"
    }

    /// `%dot <graph>` or `%%dot <line>\n<body>`.
    pub fn dot(&self, host: &mut dyn Host, line: &str, cell: Option<&str>) -> usize {
        let source = match cell {
            None => line.to_owned(),
            Some(body) => format!("{line}\n{body}"),
        };
        self.report(host, self.render(&source))
    }

    /// `%dotstr <expr>` — `expr` must evaluate to a string.
    pub fn dotstr(&self, host: &mut dyn Host, expr: &str) -> usize {
        let result = host
            .evaluate(expr)
            .map_err(MagicError::from)
            .and_then(|value| match value {
                Value::Str(s) => Ok(s),
                other => Err(MagicError::NotAString {
                    found: other.type_name().to_owned(),
                }),
            })
            .and_then(|s| self.render(&s));
        self.report(host, result)
    }

    /// `%dotobj <expr>` — `expr` must evaluate to an object with `to_dot()`.
    pub fn dotobj(&self, host: &mut dyn Host, expr: &str) -> usize {
        let result = host
            .evaluate(expr)
            .map_err(MagicError::from)
            .and_then(|value| self.render_object(&value));
        self.report(host, result)
    }

    /// `%dotobjs <expr>` — `expr` must evaluate to a sequence of objects with
    /// `to_dot()`. Each element is rendered and labelled on its own; a bad
    /// element is reported and the rest still render.
    pub fn dotobjs(&self, host: &mut dyn Host, expr: &str) -> usize {
        let items = match host.evaluate(expr) {
            Ok(Value::Sequence(items)) => items,
            Ok(other) => {
                let err = MagicError::NotASequence {
                    found: other.type_name().to_owned(),
                };
                return self.report(host, Err(err));
            }
            Err(err) => return self.report(host, Err(err.into())),
        };

        let mut displayed = 0;
        for (i, item) in items.iter().enumerate() {
            match self.render_object(item) {
                Ok(svg) if svg.is_empty() => {}
                Ok(svg) => {
                    host.info(&format!("object {i}:"));
                    host.display_svg(&svg);
                    displayed += 1;
                }
                Err(err) => {
                    tracing::debug!(index = i, error = %err, "dotobjs element failed");
                    host.error(&format!("object {i}: {err}"));
                }
            }
        }
        displayed
    }

    /// Dispatch one parsed invocation.
    pub fn run(&self, host: &mut dyn Host, invocation: &Invocation) -> usize {
        match invocation {
            Invocation::Line { name, args } => match name.as_str() {
                "dot" => self.dot(host, args, None),
                "dotstr" => self.dotstr(host, args),
                "dotobj" => self.dotobj(host, args),
                "dotobjs" => self.dotobjs(host, args),
                other => self.report(host, Err(MagicError::UnknownMagic(other.to_owned()))),
            },
            Invocation::Cell { name, line, body } => {
                if Self::is_cell_magic(name) {
                    self.dot(host, line, Some(body.as_str()))
                } else if Self::NAMES.iter().any(|known| *known == name.as_str()) {
                    self.report(host, Err(MagicError::NotACellMagic(name.clone())))
                } else {
                    self.report(host, Err(MagicError::UnknownMagic(name.clone())))
                }
            }
        }
    }

    /// Parse and run every invocation in a cell, in order.
    pub fn run_cell(&self, host: &mut dyn Host, source: &str) -> usize {
        parse_cell(source)
            .into_iter()
            .map(|parsed| match parsed {
                Ok(invocation) => self.run(host, &invocation),
                Err(err) => self.report(host, Err(err)),
            })
            .sum()
    }

    fn render(&self, source: &str) -> Result<SvgImage, MagicError> {
        Ok(self.renderer.render_svg(source)?)
    }

    fn render_object(&self, value: &Value) -> Result<SvgImage, MagicError> {
        let capability = value.as_to_dot().ok_or(CapabilityError::Missing)?;
        let source = capability.to_dot()?;
        self.render(&source)
    }

    fn report(&self, host: &mut dyn Host, result: Result<SvgImage, MagicError>) -> usize {
        match result {
            Ok(svg) if svg.is_empty() => 0,
            Ok(svg) => {
                host.display_svg(&svg);
                1
            }
            Err(err) => {
                host.error(&err.to_string());
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gvmagic_core::RenderError;
    use std::cell::RefCell;

    struct Recording(RefCell<Vec<String>>);

    impl SvgRenderer for Recording {
        fn render_svg(&self, source: &str) -> Result<SvgImage, RenderError> {
            self.0.borrow_mut().push(source.to_owned());
            Ok(SvgImage(b"<svg/>".to_vec()))
        }
    }

    #[derive(Default)]
    struct Silent {
        errors: Vec<String>,
        shown: usize,
    }

    impl Host for Silent {
        fn evaluate(&self, expr: &str) -> Result<Value, crate::EvalError> {
            Err(crate::EvalError::Undefined(expr.to_owned()))
        }
        fn display_svg(&mut self, _image: &SvgImage) {
            self.shown += 1;
        }
        fn info(&mut self, _message: &str) {}
        fn error(&mut self, message: &str) {
            self.errors.push(message.to_owned());
        }
    }

    #[test]
    fn cell_body_is_joined_with_newline() {
        let magics = GraphvizMagics::new(Recording(RefCell::new(Vec::new())));
        let mut host = Silent::default();

        assert_eq!(magics.dot(&mut host, "digraph G", Some("{ a -> b }")), 1);
        assert_eq!(magics.renderer().0.borrow()[0], "digraph G\n{ a -> b }");
    }

    #[test]
    fn line_only_dot_is_passed_through() {
        let magics = GraphvizMagics::new(Recording(RefCell::new(Vec::new())));
        let mut host = Silent::default();

        magics.dot(&mut host, "digraph{a->b}", None);
        assert_eq!(magics.renderer().0.borrow()[0], "digraph{a->b}");
    }

    #[test]
    fn eval_failure_is_reported_not_rendered() {
        let magics = GraphvizMagics::new(Recording(RefCell::new(Vec::new())));
        let mut host = Silent::default();

        assert_eq!(magics.dotstr(&mut host, "missing"), 0);
        assert_eq!(host.errors, vec!["name 'missing' is not defined".to_string()]);
        assert!(magics.renderer().0.borrow().is_empty());
    }

    #[test]
    fn cell_magic_only_for_dot() {
        assert!(GraphvizMagics::<Recording>::is_cell_magic("dot"));
        assert!(!GraphvizMagics::<Recording>::is_cell_magic("dotobjs"));
    }
}
