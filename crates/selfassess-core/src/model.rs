//! Core data model types for selfassess.
//!
//! A [`Catalog`] is the ordered list of questions, a [`Session`] is one
//! completed pass through it, and a [`ScoredSession`] pairs a session with its
//! per-category totals.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{AssessError, Result};

/// Zero-based position of a question in the catalog file.
pub type QuestionId = usize;

/// An integer answer to one question.
pub type Answer = i32;

/// Lowest answer accepted at input time.
pub const MIN_ANSWER: Answer = 0;

/// Highest answer accepted at input time.
pub const MAX_ANSWER: Answer = 5;

/// Answers at or below this value are reported as low-scoring.
pub const LOW_SCORE_THRESHOLD: Answer = 3;

/// Timestamp pattern used in the `time=` token of a results line.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y-%H:%M:%S:%6f";

/// `TIMESTAMP_FORMAT` up to the seconds field.
const WHOLE_SECONDS_FORMAT: &str = "%d.%m.%Y-%H:%M:%S";

/// Filesystem-safe timestamp pattern used to name per-session artifacts.
pub const FILE_STAMP_FORMAT: &str = "%d.%m.%Y.%H.%M.%S.%6f";

/// A single question from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Line index in the catalog file.
    pub id: QuestionId,
    /// The question as shown to the person answering.
    pub text: String,
    /// Category tag, e.g. `mental`.
    pub category: String,
}

/// The ordered set of questions loaded from a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    /// Build a catalog from `(text, category)` pairs, assigning ids by position.
    pub fn from_pairs<I, T, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: Into<String>,
        C: Into<String>,
    {
        let questions = pairs
            .into_iter()
            .enumerate()
            .map(|(id, (text, category))| Question {
                id,
                text: text.into(),
                category: category.into(),
            })
            .collect();
        Self { questions }
    }

    /// All questions in catalog order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question, failing with [`AssessError::UnknownQuestion`].
    pub fn question(&self, id: QuestionId) -> Result<&Question> {
        self.questions
            .get(id)
            .ok_or(AssessError::UnknownQuestion { id })
    }

    /// The category tag of a question.
    pub fn category_of(&self, id: QuestionId) -> Result<&str> {
        self.question(id).map(|q| q.category.as_str())
    }

    /// Question id → category tag.
    pub fn mapping(&self) -> BTreeMap<QuestionId, &str> {
        self.questions
            .iter()
            .map(|q| (q.id, q.category.as_str()))
            .collect()
    }

    /// Distinct category tags in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for q in &self.questions {
            if !seen.contains(&q.category.as_str()) {
                seen.push(q.category.as_str());
            }
        }
        seen
    }

    /// Number of questions in each category.
    pub fn category_sizes(&self) -> BTreeMap<&str, usize> {
        let mut sizes = BTreeMap::new();
        for q in &self.questions {
            *sizes.entry(q.category.as_str()).or_insert(0) += 1;
        }
        sizes
    }
}

/// One `score = label` line of the scoring key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringEntry {
    pub label: String,
    pub score: Answer,
}

/// Mapping from answer label to score, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringKey {
    entries: Vec<ScoringEntry>,
}

impl ScoringKey {
    /// Build a key from entries. A later entry with the same label replaces an earlier one.
    pub fn new(entries: Vec<ScoringEntry>) -> Self {
        let mut key = Self::default();
        for entry in entries {
            key.insert(entry);
        }
        key
    }

    fn insert(&mut self, entry: ScoringEntry) {
        match self.entries.iter_mut().find(|e| e.label == entry.label) {
            Some(existing) => existing.score = entry.score,
            None => self.entries.push(entry),
        }
    }

    pub fn entries(&self) -> &[ScoringEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Score for a label, ignoring ASCII case and surrounding whitespace.
    pub fn score_of(&self, label: &str) -> Option<Answer> {
        let label = label.trim();
        self.entries
            .iter()
            .find(|e| e.label.eq_ignore_ascii_case(label))
            .map(|e| e.score)
    }

    /// Entries ordered by ascending score, for display.
    pub fn by_score(&self) -> Vec<&ScoringEntry> {
        let mut sorted: Vec<&ScoringEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.score);
        sorted
    }
}

impl fmt::Display for ScoringKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .by_score()
            .iter()
            .map(|e| format!("{} = {}", e.score, e.label))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// One completed questionnaire pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Captured once when the questionnaire started.
    #[serde(rename = "time")]
    pub timestamp: NaiveDateTime,
    /// Question id → answer.
    pub answers: BTreeMap<QuestionId, Answer>,
}

impl Session {
    pub fn new(timestamp: NaiveDateTime, answers: BTreeMap<QuestionId, Answer>) -> Self {
        Self { timestamp, answers }
    }

    /// Sum answers per category using the catalog's question → category mapping.
    pub fn category_totals(&self, catalog: &Catalog) -> Result<BTreeMap<String, i64>> {
        let mut totals: BTreeMap<String, i64> = BTreeMap::new();
        for (&id, &answer) in &self.answers {
            let category = catalog.category_of(id)?;
            *totals.entry(category.to_string()).or_insert(0) += i64::from(answer);
        }
        Ok(totals)
    }

    /// Sum of all answers in this session.
    pub fn total(&self) -> i64 {
        self.answers.values().map(|&a| i64::from(a)).sum()
    }

    /// Timestamp in the results-file pattern.
    pub fn display_time(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Timestamp in the filesystem-safe pattern.
    pub fn file_stamp(&self) -> String {
        self.timestamp.format(FILE_STAMP_FORMAT).to_string()
    }
}

/// Parse the value of a `time=` token.
///
/// The fractional field may carry 1 to 6 digits and is read as a decimal
/// fraction, so `:5` is half a second.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let invalid =
        |detail: &str| AssessError::format(format!("invalid timestamp `{value}`: {detail}"));

    let (whole, fraction) = value
        .rsplit_once(':')
        .ok_or_else(|| invalid("missing fractional seconds"))?;
    if fraction.is_empty() || fraction.len() > 6 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("fractional seconds must be 1 to 6 digits"));
    }

    let base = NaiveDateTime::parse_from_str(whole, WHOLE_SECONDS_FORMAT)
        .map_err(|e| invalid(&e.to_string()))?;
    let micros = fraction
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(6)
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
    base.with_nanosecond(micros * 1_000)
        .ok_or_else(|| invalid("fractional seconds out of range"))
}

/// A session joined with its catalog-derived category totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredSession {
    pub session: Session,
    pub category_totals: BTreeMap<String, i64>,
}

impl ScoredSession {
    /// Compute category totals for `session`, failing on ids missing from the catalog.
    pub fn score(session: Session, catalog: &Catalog) -> Result<Self> {
        let category_totals = session.category_totals(catalog)?;
        Ok(Self {
            session,
            category_totals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_micro_opt(9, 5, 7, 42)
            .unwrap()
    }

    #[test]
    fn timestamp_fraction_accepts_short_digits() {
        let full = parse_timestamp("01.03.2024-08:00:00:100000").unwrap();
        assert_eq!(parse_timestamp("01.03.2024-08:00:00:1").unwrap(), full);
        assert_eq!(full.nanosecond(), 100_000_000);

        let written = parse_timestamp("01.03.2024-09:05:07:000042").unwrap();
        assert_eq!(written, timestamp());
        assert_eq!(
            Session::new(written, BTreeMap::new()).display_time(),
            "01.03.2024-09:05:07:000042"
        );
    }

    #[test]
    fn timestamp_fraction_rejects_bad_digits() {
        for value in [
            "01.03.2024-08:00:00:",
            "01.03.2024-08:00:00:1234567",
            "01.03.2024-08:00:00:1a",
            "01.03.2024-08:00",
        ] {
            let err = parse_timestamp(value).unwrap_err();
            assert!(err.is_format(), "{value}");
        }
    }

    #[test]
    fn category_totals_for_two_categories() {
        let catalog = Catalog::from_pairs([("Q0", "mental"), ("Q1", "technique")]);
        let session = Session::new(timestamp(), BTreeMap::from([(0, 2), (1, 5)]));

        let totals = session.category_totals(&catalog).unwrap();
        assert_eq!(totals["mental"], 2);
        assert_eq!(totals["technique"], 5);
        assert_eq!(totals.values().sum::<i64>(), session.total());
    }

    #[test]
    fn category_totals_unknown_question() {
        let catalog = Catalog::from_pairs([("Q0", "mental")]);
        let session = Session::new(timestamp(), BTreeMap::from([(0, 2), (3, 1)]));

        let err = session.category_totals(&catalog).unwrap_err();
        assert!(matches!(err, AssessError::UnknownQuestion { id: 3 }));
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let catalog = Catalog::from_pairs([
            ("a", "mental"),
            ("b", "technique"),
            ("c", "physical"),
            ("d", "mental"),
        ]);
        assert_eq!(catalog.categories(), vec!["mental", "technique", "physical"]);
        assert_eq!(catalog.category_sizes()["mental"], 2);
        assert_eq!(catalog.mapping()[&3], "mental");
    }

    #[test]
    fn scoring_key_lookup_and_display() {
        let key = ScoringKey::new(vec![
            ScoringEntry {
                label: "Always".into(),
                score: 5,
            },
            ScoringEntry {
                label: "Never".into(),
                score: 0,
            },
        ]);
        assert_eq!(key.score_of(" always "), Some(5));
        assert_eq!(key.score_of("sometimes"), None);
        assert_eq!(key.to_string(), "0 = Never, 5 = Always");
    }

    #[test]
    fn timestamp_formats() {
        let session = Session::new(timestamp(), BTreeMap::new());
        assert_eq!(session.display_time(), "01.03.2024-09:05:07:000042");
        assert_eq!(session.file_stamp(), "01.03.2024.09.05.07.000042");
    }
}
