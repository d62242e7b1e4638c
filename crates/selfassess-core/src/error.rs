//! Error types for loading catalogs and reading or writing session history.
//!
//! Line-level failures are wrapped in [`AssessError::Record`] so the message
//! names the file and line, while [`AssessError::root`] still exposes the
//! underlying kind for callers that need to branch on it.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::QuestionId;

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, AssessError>;

/// Errors that can occur while loading, collecting, or persisting sessions.
#[derive(Debug, Error)]
pub enum AssessError {
    /// A line does not match its expected delimiter/field structure.
    #[error("malformed line: {0}")]
    Format(String),

    /// A question id has no entry in the current catalog.
    #[error("question {id} is not in the catalog")]
    UnknownQuestion { id: QuestionId },

    /// A required file could not be opened, read, or written.
    #[error("failed to access {}", .path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An answer outside the accepted range was supplied.
    #[error("answer {value} is outside {min}..={max}")]
    InvalidAnswer { value: i32, min: i32, max: i32 },

    /// The answer source ran out before every question was answered.
    #[error("input closed before question {0} was answered")]
    InputClosed(QuestionId),

    /// The configuration file could not be parsed.
    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// Any of the above, located at a specific line of an input file.
    #[error("{origin}:{line}: {inner}")]
    Record {
        origin: String,
        line: usize,
        inner: Box<AssessError>,
    },
}

impl AssessError {
    /// Shorthand for a [`AssessError::Format`] error.
    pub fn format(message: impl Into<String>) -> Self {
        AssessError::Format(message.into())
    }

    /// Wrap an I/O failure on `path`.
    pub fn resource(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssessError::Resource {
            path: path.into(),
            source,
        }
    }

    /// Attach a file name and 1-based line number to this error.
    pub fn at(self, origin: &str, line: usize) -> Self {
        AssessError::Record {
            origin: origin.to_string(),
            line,
            inner: Box::new(self),
        }
    }

    /// The underlying error with any line location stripped.
    pub fn root(&self) -> &AssessError {
        match self {
            AssessError::Record { inner, .. } => inner.root(),
            other => other,
        }
    }

    /// Returns `true` for malformed input, as opposed to I/O or lookup failures.
    pub fn is_format(&self) -> bool {
        matches!(self.root(), AssessError::Format(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_message_names_origin_and_line() {
        let err = AssessError::format("expected KEY=VALUE, got `oops`").at("results.txt", 4);
        assert_eq!(
            err.to_string(),
            "results.txt:4: malformed line: expected KEY=VALUE, got `oops`"
        );
        assert!(err.is_format());
    }

    #[test]
    fn root_unwraps_location() {
        let err = AssessError::UnknownQuestion { id: 7 }.at("results.txt", 2);
        assert!(matches!(err.root(), AssessError::UnknownQuestion { id: 7 }));
        assert!(!err.is_format());
    }
}
