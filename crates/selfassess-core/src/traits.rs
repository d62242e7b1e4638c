//! Trait for anything that can answer a question.
//!
//! Implemented in [`crate::collect`] by the interactive prompt, the random
//! demo source, and a fixed list used by tests.

use crate::error::Result;
use crate::model::{Answer, Question, ScoringKey};

/// A source of answers for the questionnaire.
pub trait AnswerSource {
    /// Human-readable source name (e.g. "prompt").
    fn name(&self) -> &str;

    /// Produce an answer in `MIN_ANSWER..=MAX_ANSWER` for `question`.
    fn answer(&mut self, question: &Question, scoring: &ScoringKey) -> Result<Answer>;
}
