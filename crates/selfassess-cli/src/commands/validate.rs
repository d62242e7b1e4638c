//! The `selfassess validate` command.

use anyhow::{Context, Result};

use selfassess_core::catalog::{load_catalog, load_scoring};
use selfassess_core::validate::{validate_catalog, validate_history};

use crate::PathOverrides;

pub fn execute(paths: &PathOverrides) -> Result<()> {
    let config = super::resolve_config(paths)?;

    let catalog = load_catalog(&config.questions).context("failed to load question catalog")?;
    println!(
        "Catalog: {} ({} questions, {} categories)",
        config.questions.display(),
        catalog.len(),
        catalog.categories().len()
    );

    let mut warnings = validate_catalog(&catalog, config.theme());

    if config.scoring.exists() {
        let scoring = load_scoring(&config.scoring).context("failed to load scoring key")?;
        println!(
            "Scoring key: {} ({} labels)",
            config.scoring.display(),
            scoring.entries().len()
        );
    } else {
        println!("Scoring key: {} (missing)", config.scoring.display());
    }

    if config.results.exists() {
        let sessions = super::open_store(&config)
            .read_sessions()
            .context("failed to read results")?;
        println!(
            "Results: {} ({} sessions)",
            config.results.display(),
            sessions.len()
        );
        warnings.extend(validate_history(&catalog, &sessions));
    } else {
        println!("Results: {} (no sessions yet)", config.results.display());
    }

    for w in &warnings {
        let prefix = w
            .line
            .map(|line| format!("  [line {line}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All files valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
