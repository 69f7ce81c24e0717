//! Magic dispatch against an in-memory host and a fake renderer.

use std::collections::HashMap;

use gvmagic_core::{RenderError, SvgImage, SvgRenderer};
use gvmagic_magic::{CallError, EvalError, GraphvizMagics, Host, HostObject, ToDot, Value};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Wraps the source in `<svg>…</svg>`; sources containing `BAD` fail like a
/// layout engine rejecting its input, and `EMPTY` succeeds with no output.
struct FakeDot;

impl SvgRenderer for FakeDot {
    fn render_svg(&self, source: &str) -> Result<SvgImage, RenderError> {
        if source.contains("EMPTY") {
            return Ok(SvgImage::default());
        }
        if source.contains("BAD") {
            return Err(RenderError::Exit {
                program: "dot".into(),
                code: Some(1),
                stderr: "Error: syntax error in line 1".into(),
            });
        }
        Ok(SvgImage(format!("<svg>{source}</svg>").into_bytes()))
    }
}

#[derive(Debug)]
enum Event {
    Svg(String),
    Info(String),
    Error(String),
}

#[derive(Debug)]
struct Graph(&'static str);

impl ToDot for Graph {
    fn to_dot(&self) -> Result<String, CallError> {
        Ok(self.0.to_owned())
    }
}

impl HostObject for Graph {
    fn type_name(&self) -> &str {
        "Graph"
    }
    fn as_to_dot(&self) -> Option<&dyn ToDot> {
        Some(self)
    }
}

/// An object without the capability.
#[derive(Debug)]
struct Plain;

impl HostObject for Plain {
    fn type_name(&self) -> &str {
        "Plain"
    }
}

/// Has `to_dot`, but it wants arguments.
#[derive(Debug)]
struct NeedsArgs;

impl ToDot for NeedsArgs {
    fn to_dot(&self) -> Result<String, CallError> {
        Err(CallError::RequiresArguments)
    }
}

impl HostObject for NeedsArgs {
    fn type_name(&self) -> &str {
        "NeedsArgs"
    }
    fn as_to_dot(&self) -> Option<&dyn ToDot> {
        Some(self)
    }
}

#[derive(Default)]
struct Notebook {
    scope: HashMap<&'static str, fn() -> Value>,
    events: Vec<Event>,
}

impl Notebook {
    fn with(mut self, name: &'static str, make: fn() -> Value) -> Self {
        self.scope.insert(name, make);
        self
    }

    fn svgs(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Svg(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Error(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Host for Notebook {
    fn evaluate(&self, expr: &str) -> Result<Value, EvalError> {
        self.scope
            .get(expr.trim())
            .map(|make| make())
            .ok_or_else(|| EvalError::Undefined(expr.trim().to_owned()))
    }

    fn display_svg(&mut self, image: &SvgImage) {
        self.events
            .push(Event::Svg(String::from_utf8_lossy(image.as_bytes()).into_owned()));
    }

    fn info(&mut self, message: &str) {
        self.events.push(Event::Info(message.to_owned()));
    }

    fn error(&mut self, message: &str) {
        self.events.push(Event::Error(message.to_owned()));
    }
}

fn magics() -> GraphvizMagics<FakeDot> {
    GraphvizMagics::new(FakeDot)
}

// ---------------------------------------------------------------------------
// %dot / %%dot
// ---------------------------------------------------------------------------

#[test]
fn dot_line_renders_literal_text() {
    let mut nb = Notebook::default();
    assert_eq!(magics().dot(&mut nb, "digraph{a->b}", None), 1);
    assert_eq!(nb.svgs(), vec!["<svg>digraph{a->b}</svg>"]);
    assert!(nb.errors().is_empty());
}

#[test]
fn dot_render_failure_is_reported_with_diagnostic() {
    let mut nb = Notebook::default();
    assert_eq!(magics().dot(&mut nb, "BAD", None), 0);
    assert!(nb.svgs().is_empty());
    let errors = nb.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("dot returned 1"), "got: {}", errors[0]);
    assert!(errors[0].contains("syntax error"), "got: {}", errors[0]);
}

#[test]
fn empty_output_is_not_displayed() {
    let mut nb = Notebook::default();
    assert_eq!(magics().dot(&mut nb, "EMPTY", None), 0);
    assert!(nb.events.is_empty(), "got: {:?}", nb.events);
}

// ---------------------------------------------------------------------------
// %dotstr
// ---------------------------------------------------------------------------

#[test]
fn dotstr_renders_evaluated_string() {
    let mut nb = Notebook::default().with("g", || Value::from("graph{x}"));
    assert_eq!(magics().dotstr(&mut nb, "g"), 1);
    assert_eq!(nb.svgs(), vec!["<svg>graph{x}</svg>"]);
}

#[rstest]
#[case("n", "expected expression to evaluate to a string, got int")]
#[case("obj", "expected expression to evaluate to a string, got Graph")]
#[case("nope", "name 'nope' is not defined")]
fn dotstr_rejects_non_strings(#[case] expr: &str, #[case] message: &str) {
    let mut nb = Notebook::default()
        .with("n", || Value::Other("int".into()))
        .with("obj", || Value::Object(Box::new(Graph("g{}"))));
    assert_eq!(magics().dotstr(&mut nb, expr), 0);
    assert_eq!(nb.errors(), vec![message]);
}

// ---------------------------------------------------------------------------
// %dotobj
// ---------------------------------------------------------------------------

#[test]
fn dotobj_calls_to_dot() {
    let mut nb = Notebook::default().with("g", || Value::Object(Box::new(Graph("digraph{a}"))));
    assert_eq!(magics().dotobj(&mut nb, "g"), 1);
    assert_eq!(nb.svgs(), vec!["<svg>digraph{a}</svg>"]);
}

#[rstest]
#[case("plain", "expected object to implement 'to_dot()' method")]
#[case("text", "expected object to implement 'to_dot()' method")]
#[case("args", "expected to_dot method to be callable w/o args")]
fn dotobj_capability_violations(#[case] expr: &str, #[case] message: &str) {
    let mut nb = Notebook::default()
        .with("plain", || Value::Object(Box::new(Plain)))
        .with("text", || Value::from("digraph{}"))
        .with("args", || Value::Object(Box::new(NeedsArgs)));
    assert_eq!(magics().dotobj(&mut nb, expr), 0);
    assert_eq!(nb.errors(), vec![message]);
    assert!(nb.svgs().is_empty());
}

// ---------------------------------------------------------------------------
// %dotobjs
// ---------------------------------------------------------------------------

#[test]
fn dotobjs_continues_past_a_bad_element() {
    let mut nb = Notebook::default().with("gs", || {
        Value::Sequence(vec![
            Value::Object(Box::new(Graph("digraph{a->b}"))),
            Value::Object(Box::new(Plain)),
            Value::Object(Box::new(Graph("digraph{c->d}"))),
        ])
    });

    assert_eq!(magics().dotobjs(&mut nb, "gs"), 2);
    assert_eq!(nb.svgs(), vec!["<svg>digraph{a->b}</svg>", "<svg>digraph{c->d}</svg>"]);
    assert_eq!(
        nb.errors(),
        vec!["object 1: expected object to implement 'to_dot()' method"]
    );

    let labels: Vec<_> = nb
        .events
        .iter()
        .filter_map(|e| match e {
            Event::Info(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["object 0:", "object 2:"]);
}

#[test]
fn dotobjs_label_precedes_each_image() {
    let mut nb = Notebook::default().with("gs", || {
        Value::Sequence(vec![Value::Object(Box::new(Graph("g{}")))])
    });
    magics().dotobjs(&mut nb, "gs");
    assert!(matches!(nb.events[0], Event::Info(ref s) if s == "object 0:"));
    assert!(matches!(nb.events[1], Event::Svg(_)));
}

#[test]
fn dotobjs_reports_render_failures_per_element() {
    let mut nb = Notebook::default().with("gs", || {
        Value::Sequence(vec![
            Value::Object(Box::new(Graph("BAD"))),
            Value::Object(Box::new(NeedsArgs)),
            Value::Object(Box::new(Graph("ok"))),
        ])
    });

    assert_eq!(magics().dotobjs(&mut nb, "gs"), 1);
    let errors = nb.errors();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("object 0: dot returned 1"), "got: {}", errors[0]);
    assert_eq!(errors[1], "object 1: expected to_dot method to be callable w/o args");
}

#[test]
fn dotobjs_skips_empty_output_without_label() {
    let mut nb = Notebook::default().with("gs", || {
        Value::Sequence(vec![
            Value::Object(Box::new(Graph("EMPTY"))),
            Value::Object(Box::new(Graph("g{}"))),
        ])
    });

    assert_eq!(magics().dotobjs(&mut nb, "gs"), 1);
    assert!(nb.errors().is_empty());
    assert!(matches!(nb.events[0], Event::Info(ref s) if s == "object 1:"));
    assert_eq!(nb.svgs(), vec!["<svg>g{}</svg>"]);
}

#[test]
fn dotobjs_requires_a_sequence() {
    let mut nb = Notebook::default().with("g", || Value::Object(Box::new(Graph("g{}"))));
    assert_eq!(magics().dotobjs(&mut nb, "g"), 0);
    assert_eq!(
        nb.errors(),
        vec!["expected expression to evaluate to a sequence of objects, got Graph"]
    );
}

#[test]
fn dotobjs_empty_sequence_displays_nothing() {
    let mut nb = Notebook::default().with("gs", || Value::Sequence(Vec::new()));
    assert_eq!(magics().dotobjs(&mut nb, "gs"), 0);
    assert!(nb.events.is_empty());
}

// ---------------------------------------------------------------------------
// Cell dispatch
// ---------------------------------------------------------------------------

#[test]
fn run_cell_dispatches_cell_magic() {
    let mut nb = Notebook::default();
    let shown = magics().run_cell(&mut nb, "%%dot digraph G\n{ a -> b }\n");
    assert_eq!(shown, 1);
    assert_eq!(nb.svgs(), vec!["<svg>digraph G\n{ a -> b }</svg>"]);
}

#[test]
fn run_cell_runs_each_line_magic() {
    let mut nb = Notebook::default()
        .with("s", || Value::from("graph{s}"))
        .with("o", || Value::Object(Box::new(Graph("graph{o}"))));
    let cell = "%dot graph{l}\n%dotstr s\n# comment\n%dotobj o\n";

    assert_eq!(magics().run_cell(&mut nb, cell), 3);
    assert_eq!(
        nb.svgs(),
        vec!["<svg>graph{l}</svg>", "<svg>graph{s}</svg>", "<svg>graph{o}</svg>"]
    );
}

#[rstest]
#[case("%render graph{}", "unknown magic '%render'")]
#[case("%%dotstr s\nbody", "'%dotstr' is a line magic and does not take a cell body")]
#[case("%%neato\ngraph{}", "unknown magic '%neato'")]
#[case("%dot g{}\nprint(1)", "line 2: expected a magic invocation starting with '%'")]
fn run_cell_reports_bad_invocations(#[case] cell: &str, #[case] message: &str) {
    let mut nb = Notebook::default().with("s", || Value::from("graph{}"));
    magics().run_cell(&mut nb, cell);
    assert_eq!(nb.errors(), vec![message]);
}

#[test]
fn extension_names_are_registered() {
    assert_eq!(
        GraphvizMagics::<FakeDot>::NAMES,
        ["dot", "dotstr", "dotobj", "dotobjs"]
    );
}
