//! The `selfassess summary` command.

use std::collections::BTreeSet;

use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Table};

use selfassess_core::config::Theme;
use selfassess_core::model::ScoredSession;

use crate::PathOverrides;

pub fn execute(paths: &PathOverrides) -> Result<()> {
    let config = super::resolve_config(paths)?;
    let (_catalog, sessions) = super::load_history(&config)?;

    if sessions.is_empty() {
        println!("No sessions in {} yet.", config.results.display());
        return Ok(());
    }

    println!("{}", summary_table(&sessions, config.theme()));
    Ok(())
}

fn summary_table(sessions: &[ScoredSession], theme: &Theme) -> Table {
    let categories: BTreeSet<&str> = sessions
        .iter()
        .flat_map(|s| s.category_totals.keys().map(String::as_str))
        .collect();

    let mut header = vec![Cell::new("Session")];
    header.extend(categories.iter().map(|c| Cell::new(theme.display_name(c))));
    header.push(Cell::new("Total"));

    let mut table = Table::new();
    table.set_header(header);

    for scored in sessions {
        let mut row = vec![Cell::new(scored.session.display_time())];
        for category in &categories {
            let total = scored.category_totals.get(*category).copied().unwrap_or(0);
            row.push(Cell::new(total).set_alignment(CellAlignment::Right));
        }
        row.push(Cell::new(scored.session.total()).set_alignment(CellAlignment::Right));
        table.add_row(row);
    }

    table
}
