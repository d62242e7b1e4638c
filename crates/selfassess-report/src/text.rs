//! Printed reports: low-scoring answers and all answers, per session.

use std::collections::BTreeMap;

use anyhow::Result;

use selfassess_core::config::Theme;
use selfassess_core::model::{Answer, Catalog, ScoredSession, Session};

use crate::table::render_rst_table;

const HEADINGS: [&str; 3] = ["ID", "Question", "Answer"];

/// One `ID | Question | Answer` row.
pub type AnswerRow = [String; 3];

/// Answers at or below `threshold`, grouped by category tag.
///
/// Every low answer lands in exactly one group; rows keep ascending id order.
pub fn low_scoring_rows(
    session: &Session,
    catalog: &Catalog,
    threshold: Answer,
) -> Result<BTreeMap<String, Vec<AnswerRow>>> {
    let mut low: BTreeMap<String, Vec<AnswerRow>> = BTreeMap::new();
    for (&id, &answer) in &session.answers {
        if answer > threshold {
            continue;
        }
        let question = catalog.question(id)?;
        low.entry(question.category.clone()).or_default().push([
            id.to_string(),
            question.text.clone(),
            answer.to_string(),
        ]);
    }
    Ok(low)
}

/// All answers, with low ones marked by a trailing `*`, plus the same rows
/// grouped by category.
pub fn marked_rows(
    session: &Session,
    catalog: &Catalog,
    threshold: Answer,
) -> Result<(Vec<AnswerRow>, BTreeMap<String, Vec<AnswerRow>>)> {
    let mut all = Vec::new();
    let mut by_category: BTreeMap<String, Vec<AnswerRow>> = BTreeMap::new();
    for (&id, &answer) in &session.answers {
        let question = catalog.question(id)?;
        let mut shown = answer.to_string();
        if answer <= threshold {
            shown.push('*');
        }
        let row = [id.to_string(), question.text.clone(), shown];
        by_category
            .entry(question.category.clone())
            .or_default()
            .push(row.clone());
        all.push(row);
    }
    Ok((all, by_category))
}

/// For each session, one table per category listing its low-scoring answers.
pub fn low_scoring_report(
    sessions: &[ScoredSession],
    catalog: &Catalog,
    theme: &Theme,
    threshold: Answer,
) -> Result<String> {
    let mut out = Vec::new();
    for scored in sessions {
        push_session_header(&mut out, &scored.session);
        for (category, rows) in low_scoring_rows(&scored.session, catalog, threshold)? {
            let title = format!(
                "Lowest scoring in category \"{}\"",
                theme.display_name(&category)
            );
            out.extend(render_table(&rows, &title)?);
        }
    }
    Ok(join_lines(out))
}

/// For each session, one table of every answer and one table per category.
pub fn full_report(
    sessions: &[ScoredSession],
    catalog: &Catalog,
    theme: &Theme,
    threshold: Answer,
) -> Result<String> {
    let mut out = Vec::new();
    for scored in sessions {
        push_session_header(&mut out, &scored.session);
        let (all, by_category) = marked_rows(&scored.session, catalog, threshold)?;
        out.extend(render_table(&all, "Answers for questions")?);
        for (category, rows) in by_category {
            let title = format!(
                "Answers for category \"{}\"",
                theme.display_name(&category)
            );
            out.extend(render_table(&rows, &title)?);
        }
    }
    Ok(join_lines(out))
}

fn render_table(rows: &[AnswerRow], title: &str) -> Result<Vec<String>> {
    let rows: Vec<Vec<&str>> = rows
        .iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect();
    render_rst_table(&rows, title, &HEADINGS)
}

fn push_session_header(out: &mut Vec<String>, session: &Session) {
    out.push(String::new());
    out.push(format!("Results for questions on {}", session.display_time()));
}

fn join_lines(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn catalog() -> Catalog {
        Catalog::from_pairs([
            ("Q0", "mental"),
            ("Q1", "technique"),
            ("Q2", "mental"),
            ("Q3", "physical"),
        ])
    }

    fn scored(answers: &[(usize, Answer)]) -> ScoredSession {
        let timestamp = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_micro_opt(18, 0, 0, 500)
            .unwrap();
        let session = Session::new(timestamp, answers.iter().copied().collect());
        ScoredSession::score(session, &catalog()).unwrap()
    }

    #[test]
    fn low_rows_only_contain_low_answers_once() {
        let s = scored(&[(0, 1), (1, 4), (2, 3), (3, 0)]);
        let low = low_scoring_rows(&s.session, &catalog(), 3).unwrap();

        let all_rows: Vec<&AnswerRow> = low.values().flatten().collect();
        assert!(all_rows.iter().all(|r| r[2].parse::<Answer>().unwrap() <= 3));

        let mut ids: Vec<&str> = all_rows.iter().map(|r| r[0].as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["0", "2", "3"]);
        assert_eq!(low["mental"].len(), 2);
        assert!(!low.contains_key("technique"));
    }

    #[test]
    fn full_report_marks_low_answers() {
        let catalog = Catalog::from_pairs([("Q0", "mental"), ("Q1", "technique")]);
        let session = scored(&[(0, 2), (1, 5)]);
        let report = full_report(&[session], &catalog, &Theme::default(), 3).unwrap();

        assert!(report.contains("| 0  |    Q0    |   2*   |"));
        assert!(report.contains("| 1  |    Q1    |   5    |"));
        assert!(report.contains("Answers for category \"Mental\""));
        assert!(report.contains("Answers for category \"Technique and Tactics\""));
    }

    #[test]
    fn full_report_layout_order() {
        let report = full_report(&[scored(&[(0, 2), (3, 5)])], &catalog(), &Theme::default(), 3).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "Results for questions on 01.06.2024-18:00:00:000500");
        let all = report.find("Answers for questions").unwrap();
        let mental = report.find("\"Mental\"").unwrap();
        let physical = report.find("\"Physical\"").unwrap();
        assert!(all < mental && mental < physical);
    }

    #[test]
    fn low_report_titles_use_theme() {
        let theme = Theme::empty().with_category("mental", "Head", "#000000");
        let report = low_scoring_report(&[scored(&[(0, 1), (3, 2)])], &catalog(), &theme, 3).unwrap();
        assert!(report.contains("Lowest scoring in category \"Head\""));
        assert!(report.contains("Lowest scoring in category \"physical\""));
        assert!(!report.contains('*'));
    }

    #[test]
    fn session_without_low_answers_prints_header_only() {
        let report = low_scoring_report(&[scored(&[(0, 5), (1, 4)])], &catalog(), &Theme::default(), 3).unwrap();
        assert_eq!(report, "\nResults for questions on 01.06.2024-18:00:00:000500\n");
    }

    #[test]
    fn threshold_is_configurable() {
        let s = scored(&[(0, 2), (1, 3)]);
        let low = low_scoring_rows(&s.session, &catalog(), 2).unwrap();
        assert_eq!(low.values().map(Vec::len).sum::<usize>(), 1);
    }
}
