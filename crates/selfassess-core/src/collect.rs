//! Answer collection.
//!
//! [`run_questionnaire`] walks the catalog in order, asks an [`AnswerSource`]
//! for each answer, and returns the finished session with its category totals.
//! All answers share the timestamp taken before the first question.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{AssessError, Result};
use crate::model::{
    Answer, Catalog, Question, ScoredSession, ScoringKey, Session, MAX_ANSWER, MIN_ANSWER,
};
use crate::traits::AnswerSource;

/// Run the questionnaire now.
pub fn run_questionnaire(
    catalog: &Catalog,
    scoring: &ScoringKey,
    source: &mut dyn AnswerSource,
) -> Result<ScoredSession> {
    let started_at = chrono::Local::now().naive_local();
    run_questionnaire_at(catalog, scoring, source, started_at)
}

/// Run the questionnaire with an explicit start timestamp.
pub fn run_questionnaire_at(
    catalog: &Catalog,
    scoring: &ScoringKey,
    source: &mut dyn AnswerSource,
    started_at: NaiveDateTime,
) -> Result<ScoredSession> {
    let mut answers = BTreeMap::new();
    let mut category_totals: BTreeMap<String, i64> = BTreeMap::new();

    for question in catalog.questions() {
        let answer = source.answer(question, scoring)?;
        check_range(answer)?;
        tracing::debug!(
            "{} answered question {} ({}): {answer}",
            source.name(),
            question.id,
            question.category
        );
        answers.insert(question.id, answer);
        *category_totals.entry(question.category.clone()).or_insert(0) += i64::from(answer);
    }

    Ok(ScoredSession {
        session: Session::new(started_at, answers),
        category_totals,
    })
}

fn check_range(answer: Answer) -> Result<()> {
    if (MIN_ANSWER..=MAX_ANSWER).contains(&answer) {
        Ok(())
    } else {
        Err(AssessError::InvalidAnswer {
            value: answer,
            min: MIN_ANSWER,
            max: MAX_ANSWER,
        })
    }
}

/// Interactive source that prints each question and reads a line per answer.
///
/// Accepts an integer in range or a scoring label; anything else re-prompts.
pub struct PromptAnswers<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptAnswers<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn write_prompt(&mut self, question: &Question, scoring: &ScoringKey) -> std::io::Result<()> {
        writeln!(
            self.output,
            "\n[{}] {} ({})",
            question.id, question.text, question.category
        )?;
        if !scoring.is_empty() {
            writeln!(self.output, "  {scoring}")?;
        }
        write!(self.output, "Answer ({MIN_ANSWER}-{MAX_ANSWER}): ")?;
        self.output.flush()
    }
}

/// Interpret one line of prompt input.
pub fn parse_answer(input: &str, scoring: &ScoringKey) -> Option<Answer> {
    let input = input.trim();
    let value = match input.parse::<Answer>() {
        Ok(v) => v,
        Err(_) => scoring.score_of(input)?,
    };
    (MIN_ANSWER..=MAX_ANSWER).contains(&value).then_some(value)
}

impl<R: BufRead, W: Write> AnswerSource for PromptAnswers<R, W> {
    fn name(&self) -> &str {
        "prompt"
    }

    fn answer(&mut self, question: &Question, scoring: &ScoringKey) -> Result<Answer> {
        let stdio_err = |e| AssessError::resource("<stdio>", e);
        loop {
            self.write_prompt(question, scoring).map_err(stdio_err)?;

            let mut line = String::new();
            let read = self.input.read_line(&mut line).map_err(stdio_err)?;
            if read == 0 {
                return Err(AssessError::InputClosed(question.id));
            }
            if let Some(answer) = parse_answer(&line, scoring) {
                return Ok(answer);
            }
            writeln!(
                self.output,
                "  `{}` is not a valid answer, enter {MIN_ANSWER}-{MAX_ANSWER} or a label",
                line.trim()
            )
            .map_err(stdio_err)?;
        }
    }
}

/// Demo source drawing uniform answers in range.
pub struct RandomAnswers {
    rng: StdRng,
}

impl RandomAnswers {
    /// Seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAnswers {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerSource for RandomAnswers {
    fn name(&self) -> &str {
        "random"
    }

    fn answer(&mut self, _question: &Question, _scoring: &ScoringKey) -> Result<Answer> {
        Ok(self.rng.random_range(MIN_ANSWER..=MAX_ANSWER))
    }
}

/// Pre-set answers handed out in catalog order.
pub struct FixedAnswers {
    answers: std::vec::IntoIter<Answer>,
}

impl FixedAnswers {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers.into_iter(),
        }
    }
}

impl AnswerSource for FixedAnswers {
    fn name(&self) -> &str {
        "fixed"
    }

    fn answer(&mut self, question: &Question, _scoring: &ScoringKey) -> Result<Answer> {
        self.answers
            .next()
            .ok_or(AssessError::InputClosed(question.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScoringEntry;
    use chrono::NaiveDate;

    fn catalog() -> Catalog {
        Catalog::from_pairs([
            ("Q0", "mental"),
            ("Q1", "technique"),
            ("Q2", "mental"),
        ])
    }

    fn scoring() -> ScoringKey {
        ScoringKey::new(vec![
            ScoringEntry {
                label: "Never".into(),
                score: 0,
            },
            ScoringEntry {
                label: "Often".into(),
                score: 3,
            },
        ])
    }

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
    }

    #[test]
    fn fixed_answers_accumulate_per_category() {
        let mut source = FixedAnswers::new(vec![2, 5, 4]);
        let scored = run_questionnaire_at(&catalog(), &scoring(), &mut source, start()).unwrap();

        assert_eq!(scored.session.timestamp, start());
        assert_eq!(scored.session.answers, BTreeMap::from([(0, 2), (1, 5), (2, 4)]));
        assert_eq!(scored.category_totals["mental"], 6);
        assert_eq!(scored.category_totals["technique"], 5);
        assert_eq!(scored.category_totals, scored.session.category_totals(&catalog()).unwrap());
    }

    #[test]
    fn running_out_of_answers() {
        let mut source = FixedAnswers::new(vec![1]);
        let err = run_questionnaire_at(&catalog(), &scoring(), &mut source, start()).unwrap_err();
        assert!(matches!(err, AssessError::InputClosed(1)));
    }

    #[test]
    fn out_of_range_answer_rejected() {
        let mut source = FixedAnswers::new(vec![1, 9, 2]);
        let err = run_questionnaire_at(&catalog(), &scoring(), &mut source, start()).unwrap_err();
        assert!(matches!(err, AssessError::InvalidAnswer { value: 9, .. }));
    }

    #[test]
    fn random_answers_stay_in_range_and_are_seeded() {
        let run = |seed| {
            let mut source = RandomAnswers::with_seed(seed);
            run_questionnaire_at(&catalog(), &scoring(), &mut source, start()).unwrap()
        };
        let a = run(7);
        let b = run(7);
        assert_eq!(a, b);
        assert!(a
            .session
            .answers
            .values()
            .all(|v| (MIN_ANSWER..=MAX_ANSWER).contains(v)));
    }

    #[test]
    fn parse_answer_accepts_numbers_and_labels() {
        assert_eq!(parse_answer(" 4\n", &scoring()), Some(4));
        assert_eq!(parse_answer("often", &scoring()), Some(3));
        assert_eq!(parse_answer("6", &scoring()), None);
        assert_eq!(parse_answer("-1", &scoring()), None);
        assert_eq!(parse_answer("maybe", &scoring()), None);
    }

    #[test]
    fn prompt_reprompts_on_bad_input() {
        let input = b"x\n7\n2\nNever\n5\n";
        let mut output = Vec::new();
        let scored = {
            let mut source = PromptAnswers::new(&input[..], &mut output);
            run_questionnaire_at(&catalog(), &scoring(), &mut source, start()).unwrap()
        };

        assert_eq!(scored.session.answers, BTreeMap::from([(0, 2), (1, 0), (2, 5)]));
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("[0] Q0 (mental)"));
        assert!(shown.contains("0 = Never, 3 = Often"));
        assert_eq!(shown.matches("is not a valid answer").count(), 2);
    }

    #[test]
    fn prompt_end_of_input() {
        let input = b"3\n";
        let mut source = PromptAnswers::new(&input[..], Vec::new());
        let err = run_questionnaire_at(&catalog(), &scoring(), &mut source, start()).unwrap_err();
        assert!(matches!(err, AssessError::InputClosed(1)));
    }
}
