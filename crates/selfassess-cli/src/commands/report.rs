//! The `selfassess report` command.

use anyhow::Result;

use selfassess_report::text::{full_report, low_scoring_report};

use crate::{PathOverrides, ReportKind};

pub fn execute(paths: &PathOverrides, kind: ReportKind) -> Result<()> {
    let config = super::resolve_config(paths)?;
    let (catalog, sessions) = super::load_history(&config)?;

    if sessions.is_empty() {
        println!("No sessions in {} yet.", config.results.display());
        return Ok(());
    }

    let theme = config.theme();
    let threshold = config.low_score_threshold;

    if matches!(kind, ReportKind::Low | ReportKind::All) {
        print!("{}", low_scoring_report(&sessions, &catalog, theme, threshold)?);
    }
    if matches!(kind, ReportKind::Full | ReportKind::All) {
        print!("{}", full_report(&sessions, &catalog, theme, threshold)?);
    }

    Ok(())
}
