//! Entry point for the reticle demo: parses the CLI surface, initialises
//! tracing, and hands over to `run.rs` for the window, scene, and render
//! loop.

mod cli;
mod diagnostics;
mod run;
mod scene;

use anyhow::Result;

fn main() -> Result<()> {
    let args = cli::parse();
    run::initialise_tracing();
    run::run(args)
}
