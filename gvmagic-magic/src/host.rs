//! The seam between the magics and whatever notebook runs them.

use std::fmt;

use gvmagic_core::SvgImage;

use crate::error::{CallError, EvalError};

/// A notebook host: evaluates expressions and shows results to the user.
pub trait Host {
    /// Evaluate `expr` in the host's current variable scope.
    fn evaluate(&self, expr: &str) -> Result<Value, EvalError>;

    /// Show an image. `image` is raw `image/svg+xml`.
    fn display_svg(&mut self, image: &SvgImage);

    /// Informational message (e.g. the per-object label in `%dotobjs`).
    fn info(&mut self, message: &str);

    /// User-facing diagnostic.
    fn error(&mut self, message: &str);
}

/// Zero-argument text-producing capability.
pub trait ToDot {
    fn to_dot(&self) -> Result<String, CallError>;
}

/// An opaque host object. Implementors expose [`ToDot`] by overriding
/// [`HostObject::as_to_dot`].
pub trait HostObject: fmt::Debug {
    fn type_name(&self) -> &str;

    fn as_to_dot(&self) -> Option<&dyn ToDot> {
        None
    }
}

/// Result of [`Host::evaluate`].
#[derive(Debug)]
pub enum Value {
    Str(String),
    Sequence(Vec<Value>),
    Object(Box<dyn HostObject>),
    /// Anything else; carries the host's type name for diagnostics.
    Other(String),
}

impl Value {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Str(_) => "str",
            Self::Sequence(_) => "sequence",
            Self::Object(obj) => obj.type_name(),
            Self::Other(name) => name,
        }
    }

    /// Interface query for the `to_dot()` capability.
    pub fn as_to_dot(&self) -> Option<&dyn ToDot> {
        match self {
            Self::Object(obj) => obj.as_to_dot(),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}
