//! `gvmagic render [FILE] [-o OUT]` — one description in, one SVG out.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::EngineArgs;

/// Arguments for `gvmagic render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// DOT source file; omit or pass `-` to read stdin.
    pub input: Option<PathBuf>,

    /// Write the SVG here instead of stdout.
    #[arg(long, short = 'o', value_name = "OUT")]
    pub output: Option<PathBuf>,
}

impl RenderArgs {
    pub fn run(self, engine: &EngineArgs) -> Result<()> {
        let engine = engine.resolve()?;

        let (text, label) = match self.input.as_deref() {
            Some(path) if path.as_os_str() != "-" => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("cannot read '{}'", path.display()))?;
                (text, path.display().to_string())
            }
            _ => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("cannot read DOT source from stdin")?;
                (text, "<stdin>".to_string())
            }
        };

        let svg = engine
            .renderer
            .render(&text)
            .with_context(|| format!("failed to render {label}"))?;

        match self.output {
            Some(path) => {
                std::fs::write(&path, svg.as_bytes())
                    .with_context(|| format!("cannot write '{}'", path.display()))?;
                eprintln!("✓ wrote {} ({} bytes)", path.display(), svg.len());
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(svg.as_bytes())
                    .and_then(|()| stdout.flush())
                    .context("cannot write SVG to stdout")?;
            }
        }
        Ok(())
    }
}
