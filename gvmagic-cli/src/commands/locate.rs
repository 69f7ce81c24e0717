//! `gvmagic locate` — report the resolved `dot` executable.

use anyhow::Result;
use clap::Args;

use crate::EngineArgs;

/// Arguments for `gvmagic locate`.
#[derive(Args, Debug)]
pub struct LocateArgs {}

impl LocateArgs {
    pub fn run(self, engine: &EngineArgs) -> Result<()> {
        let engine = engine.resolve()?;
        println!("{}", engine.located.executable);
        println!("  source:  {}", engine.located.source);
        match engine.renderer.timeout() {
            Some(timeout) => println!("  timeout: {}s", timeout.as_secs()),
            None => println!("  timeout: none"),
        }
        Ok(())
    }
}
