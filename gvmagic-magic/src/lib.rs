//! # gvmagic-magic
//!
//! Notebook dispatch layer: the `%dot`, `%%dot`, `%dotstr`, `%dotobj` and
//! `%dotobjs` magics. Each one obtains a graph description (literal text, an
//! evaluated string, or the `to_dot()` of evaluated objects), renders it
//! through an [`SvgRenderer`](gvmagic_core::SvgRenderer) and hands the SVG to
//! the [`Host`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gvmagic_core::{locate, DotRenderer, LocatorInputs};
//! use gvmagic_magic::{GraphvizMagics, Host};
//!
//! fn run(host: &mut dyn Host) {
//!     let renderer = DotRenderer::from(locate(&LocatorInputs::from_env()));
//!     let magics = GraphvizMagics::new(renderer);
//!     magics.dot(host, "digraph { a -> b }", None);
//! }
//! ```

pub mod cell;
pub mod error;
pub mod host;
pub mod magics;

pub use cell::{parse_cell, Invocation};
pub use error::{CallError, CapabilityError, EvalError, MagicError};
pub use host::{Host, HostObject, ToDot, Value};
pub use magics::GraphvizMagics;
