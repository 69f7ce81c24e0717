//! gvmagic core library — locating `dot` and running it.
//!
//! - [`locator`] — resolve the executable once per process
//! - [`invoker`] — [`DotRenderer`], one child process per render
//! - [`config`] — optional `~/.gvmagic/config.yaml`
//! - [`error`] — [`RenderError`], [`ConfigError`]
//!
//! ```rust,no_run
//! use gvmagic_core::{locate, DotRenderer, LocatorInputs};
//!
//! let renderer = DotRenderer::from(locate(&LocatorInputs::from_env()));
//! match renderer.render("digraph { a -> b }") {
//!     Ok(svg) => println!("{} bytes of SVG", svg.len()),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```

pub mod config;
pub mod error;
pub mod invoker;
pub mod locator;
pub mod types;

pub use config::GvConfig;
pub use error::{ConfigError, RenderError};
pub use invoker::{DotRenderer, SvgRenderer};
pub use locator::{locate, LocatorInputs};
pub use types::{ExecutableRef, Located, ResolutionSource, SvgImage, DOT_COMMAND, OUTPUT_FORMAT};
