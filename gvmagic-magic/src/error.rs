//! Error types for gvmagic-magic.

use thiserror::Error;

use gvmagic_core::RenderError;

/// Failure raised while evaluating an expression in the host scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("name '{0}' is not defined")]
    Undefined(String),

    #[error("invalid expression '{expr}': {message}")]
    Invalid { expr: String, message: String },
}

/// Failure raised by a `to_dot()` call itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The capability exists but cannot be called without arguments.
    #[error("to_dot requires arguments")]
    RequiresArguments,

    /// The call ran and raised.
    #[error("to_dot failed: {0}")]
    Raised(String),
}

/// The evaluated value does not offer a usable `to_dot()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("expected object to implement 'to_dot()' method")]
    Missing,

    #[error("expected to_dot method to be callable w/o args")]
    Signature,
}

/// Everything a single magic invocation can report to the user.
#[derive(Debug, Error)]
pub enum MagicError {
    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("expected expression to evaluate to a string, got {found}")]
    NotAString { found: String },

    #[error("expected expression to evaluate to a sequence of objects, got {found}")]
    NotASequence { found: String },

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    Call(CallError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("unknown magic '%{0}'")]
    UnknownMagic(String),

    #[error("'%{0}' is a line magic and does not take a cell body")]
    NotACellMagic(String),

    #[error("line {line}: expected a magic invocation starting with '%'")]
    NotAMagic { line: usize },
}

impl From<CallError> for MagicError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::RequiresArguments => Self::Capability(CapabilityError::Signature),
            other => Self::Call(other),
        }
    }
}
