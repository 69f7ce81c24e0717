//! `gvmagic cell <CELL> [--scope SCOPE.json] [--out-dir DIR]` — run a cell of
//! magics the way a notebook would.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use gvmagic_magic::GraphvizMagics;

use crate::host::{JsonHost, SvgSink};
use crate::EngineArgs;

/// Arguments for `gvmagic cell`.
#[derive(Args, Debug)]
pub struct CellArgs {
    /// File holding the cell text (`%dot ...`, `%%dot ...`, `%dotobjs ...`).
    pub cell: PathBuf,

    /// JSON object whose keys are the variables magics can evaluate.
    #[arg(long, value_name = "SCOPE.json")]
    pub scope: Option<PathBuf>,

    /// Write each image to DIR/<cell-stem>-<n>.svg instead of stdout.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

impl CellArgs {
    pub fn run(self, engine: &EngineArgs) -> Result<()> {
        let source = std::fs::read_to_string(&self.cell)
            .with_context(|| format!("cannot read cell '{}'", self.cell.display()))?;

        let scope = match &self.scope {
            Some(path) => JsonHost::load_scope(path)?,
            None => serde_json::Map::new(),
        };

        let sink = match self.out_dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("cannot create '{}'", dir.display()))?;
                let stem = self
                    .cell
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "cell".to_string());
                SvgSink::Dir { dir, stem }
            }
            None => SvgSink::Stdout,
        };

        let engine = engine.resolve()?;
        let magics = GraphvizMagics::new(engine.renderer);
        let mut host = JsonHost::new(scope, sink);
        let shown = magics.run_cell(&mut host, &source);

        tracing::info!(images = shown, errors = host.error_count(), "cell finished");
        if host.error_count() > 0 {
            bail!(
                "{} error(s) reported while running '{}'",
                host.error_count(),
                self.cell.display()
            );
        }
        Ok(())
    }
}
