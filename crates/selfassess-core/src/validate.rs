//! Consistency checks for a catalog and its session history.
//!
//! Unlike [`crate::store::ResultStore::read_all`], these checks collect every
//! problem instead of stopping at the first one.

use std::collections::HashSet;

use crate::config::Theme;
use crate::model::{Catalog, Session, MAX_ANSWER, MIN_ANSWER};

/// A warning from catalog or history validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Line in the results file, when the warning concerns a session.
    pub line: Option<usize>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn catalog(message: String) -> Self {
        Self {
            line: None,
            message,
        }
    }

    fn at(line: usize, message: String) -> Self {
        Self {
            line: Some(line),
            message,
        }
    }
}

/// Validate a catalog against the theme used to display it.
pub fn validate_catalog(catalog: &Catalog, theme: &Theme) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_text = HashSet::new();
    for q in catalog.questions() {
        if q.text.is_empty() {
            warnings.push(ValidationWarning::catalog(format!(
                "question {} has no text",
                q.id
            )));
        } else if !seen_text.insert(q.text.as_str()) {
            warnings.push(ValidationWarning::catalog(format!(
                "question {} duplicates an earlier question: {}",
                q.id, q.text
            )));
        }

        if q.category.is_empty() {
            warnings.push(ValidationWarning::catalog(format!(
                "question {} has no category",
                q.id
            )));
        }
    }

    for category in catalog.categories() {
        if !category.is_empty() && !theme.contains(category) {
            warnings.push(ValidationWarning::catalog(format!(
                "category `{category}` has no display name or color configured"
            )));
        }
    }

    warnings
}

/// Validate stored sessions (with their line numbers) against the catalog.
pub fn validate_history(catalog: &Catalog, sessions: &[(usize, Session)]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut previous = None;

    for (line, session) in sessions {
        for (&id, &answer) in &session.answers {
            if catalog.question(id).is_err() {
                warnings.push(ValidationWarning::at(
                    *line,
                    format!("question {id} is not in the catalog"),
                ));
            }
            if !(MIN_ANSWER..=MAX_ANSWER).contains(&answer) {
                warnings.push(ValidationWarning::at(
                    *line,
                    format!("answer {answer} to question {id} is outside {MIN_ANSWER}..={MAX_ANSWER}"),
                ));
            }
        }

        if let Some(prev) = previous {
            if session.timestamp < prev {
                warnings.push(ValidationWarning::at(
                    *line,
                    format!("session {} is older than the one before it", session.display_time()),
                ));
            }
        }
        previous = Some(session.timestamp);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::BTreeMap;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn clean_catalog_has_no_warnings() {
        let catalog = Catalog::from_pairs([("Q0", "mental"), ("Q1", "physical")]);
        assert!(validate_catalog(&catalog, &Theme::default()).is_empty());
    }

    #[test]
    fn catalog_problems() {
        let catalog = Catalog::from_pairs([("Q0", "mental"), ("Q0", "sleep"), ("", "")]);
        let warnings = validate_catalog(&catalog, &Theme::default());
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();

        assert!(messages.iter().any(|m| m.contains("duplicates")));
        assert!(messages.iter().any(|m| m.contains("has no text")));
        assert!(messages.iter().any(|m| m.contains("has no category")));
        assert!(messages.iter().any(|m| m.contains("`sleep`")));
    }

    #[test]
    fn history_problems() {
        let catalog = Catalog::from_pairs([("Q0", "mental")]);
        let sessions = vec![
            (1, Session::new(day(2), BTreeMap::from([(0, 3)]))),
            (2, Session::new(day(1), BTreeMap::from([(0, 8), (4, 1)]))),
        ];

        let warnings = validate_history(&catalog, &sessions);
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().all(|w| w.line == Some(2)));
        assert!(warnings.iter().any(|w| w.message.contains("outside")));
        assert!(warnings.iter().any(|w| w.message.contains("not in the catalog")));
        assert!(warnings.iter().any(|w| w.message.contains("older")));
    }
}
