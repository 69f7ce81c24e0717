//! gvmagic — render Graphviz DOT to SVG through the `dot` layout engine.
//!
//! # Usage
//!
//! ```text
//! gvmagic render [FILE] [-o OUT.svg]
//! gvmagic cell <CELL> [--scope SCOPE.json] [--out-dir DIR]
//! gvmagic locate
//! ```
//!
//! Global flags: `--dot <PATH>` (or `GVMAGIC_DOT`), `--timeout <SECS>`.

mod commands;
mod host;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use commands::{cell::CellArgs, locate::LocateArgs, render::RenderArgs};
use gvmagic_core::{config, locate, ConfigError, DotRenderer, GvConfig, Located, LocatorInputs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "gvmagic",
    version,
    about = "Render Graphviz descriptions to SVG, inline-notebook style",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one DOT description from a file or stdin.
    Render(RenderArgs),

    /// Run a notebook-style cell of %dot magics.
    Cell(CellArgs),

    /// Show which `dot` executable would be used, and why.
    Locate(LocateArgs),
}

/// Flags shared by every subcommand that talks to the layout engine.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Path to the `dot` executable (overrides GVMAGIC_DOT and the config file).
    #[arg(long, global = true, value_name = "PATH")]
    pub dot: Option<PathBuf>,

    /// Kill the layout engine after this many seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Executable resolution and renderer, built once per process.
pub struct Engine {
    pub located: Located,
    pub renderer: DotRenderer,
}

impl EngineArgs {
    pub fn resolve(&self) -> Result<Engine> {
        let config = load_config()?;
        let inputs = LocatorInputs::from_env()
            .with_config(&config)
            .with_explicit(self.dot.clone());
        let located = locate(&inputs);

        let mut renderer = DotRenderer::new(located.executable.clone());
        if let Some(timeout) = self.timeout.map(Duration::from_secs).or(config.timeout()) {
            renderer = renderer.with_timeout(timeout);
        }

        tracing::debug!(executable = %located.executable, source = %located.source, "resolved layout engine");
        Ok(Engine { located, renderer })
    }
}

fn load_config() -> Result<GvConfig> {
    match config::load() {
        Ok(config) => Ok(config),
        Err(ConfigError::HomeNotFound) => {
            tracing::warn!("no home directory; ignoring config file");
            Ok(GvConfig::default())
        }
        Err(err) => Err(err).context("failed to load ~/.gvmagic/config.yaml"),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => args.run(&cli.engine),
        Commands::Cell(args) => args.run(&cli.engine),
        Commands::Locate(args) => args.run(&cli.engine),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
