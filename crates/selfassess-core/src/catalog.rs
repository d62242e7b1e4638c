//! Loaders for the question catalog and the scoring key.
//!
//! Catalog lines look like `How calm were you? | mental`, scoring lines like
//! `3 = Often`. Both are whitespace-trimmed around the delimiter.

use std::path::Path;

use crate::error::{AssessError, Result};
use crate::model::{Answer, Catalog, ScoringEntry, ScoringKey};

/// Read a catalog file.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = read_file(path)?;
    parse_catalog_str(&content, &path.display().to_string())
}

/// Parse catalog text. `origin` names the source in error messages.
pub fn parse_catalog_str(content: &str, origin: &str) -> Result<Catalog> {
    let pairs = content
        .lines()
        .enumerate()
        .map(|(i, line)| parse_catalog_line(line).map_err(|e| e.at(origin, i + 1)))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("loaded {} questions from {origin}", pairs.len());
    Ok(Catalog::from_pairs(pairs))
}

fn parse_catalog_line(line: &str) -> Result<(String, String)> {
    let mut fields = line.split('|');
    let text = fields.next().unwrap_or_default().trim();
    let category = fields
        .next()
        .ok_or_else(|| AssessError::format(format!("expected `TEXT | CATEGORY`, got `{line}`")))?
        .trim();
    Ok((text.to_string(), category.to_string()))
}

/// Read a scoring key file.
pub fn load_scoring(path: &Path) -> Result<ScoringKey> {
    let content = read_file(path)?;
    parse_scoring_str(&content, &path.display().to_string())
}

/// Parse scoring key text. `origin` names the source in error messages.
pub fn parse_scoring_str(content: &str, origin: &str) -> Result<ScoringKey> {
    let entries = content
        .lines()
        .enumerate()
        .map(|(i, line)| parse_scoring_line(line).map_err(|e| e.at(origin, i + 1)))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("loaded {} scoring labels from {origin}", entries.len());
    Ok(ScoringKey::new(entries))
}

fn parse_scoring_line(line: &str) -> Result<ScoringEntry> {
    let mut fields = line.split('=');
    let score = fields.next().unwrap_or_default().trim();
    let label = fields
        .next()
        .ok_or_else(|| AssessError::format(format!("expected `SCORE = LABEL`, got `{line}`")))?
        .trim();
    let score: Answer = score
        .parse()
        .map_err(|_| AssessError::format(format!("score `{score}` is not an integer")))?;
    Ok(ScoringEntry {
        label: label.to_string(),
        score,
    })
}

pub(crate) fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| AssessError::resource(path, e))
}
