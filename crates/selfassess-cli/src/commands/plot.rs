//! The `selfassess plot` command.

use std::path::PathBuf;

use anyhow::Result;

use selfassess_report::chart::write_charts;

use crate::PathOverrides;

pub fn execute(paths: &PathOverrides, output: Option<PathBuf>) -> Result<()> {
    let config = super::resolve_config(paths)?;
    let (catalog, sessions) = super::load_history(&config)?;

    let dir = output.unwrap_or_else(|| config.output_dir.clone());
    let written = write_charts(&sessions, &catalog, config.theme(), &dir)?;

    println!(
        "Wrote {} chart(s) for {} session(s) to {}",
        written.len(),
        sessions.len(),
        dir.display()
    );
    Ok(())
}
