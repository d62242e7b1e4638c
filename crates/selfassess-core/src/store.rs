//! Append-only session history.
//!
//! Each session is one line. The default token format looks like
//!
//! ```text
//! time=01.03.2024-09:05:07:000042 0=3 1=5 2=1
//! ```
//!
//! and the JSON format writes one object per line. The reader accepts both,
//! line by line, so a history can switch formats without being rewritten.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::catalog::read_file;
use crate::error::{AssessError, Result};
use crate::model::{parse_timestamp, Answer, Catalog, QuestionId, ScoredSession, Session};

/// How appended sessions are encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// `time=... id=answer ...`
    #[default]
    Tokens,
    /// `{"time": "...", "answers": {...}}`
    Json,
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFormat::Tokens => write!(f, "tokens"),
            RecordFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for RecordFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tokens" | "text" => Ok(RecordFormat::Tokens),
            "json" | "jsonl" => Ok(RecordFormat::Json),
            other => Err(format!("unknown record format: {other}")),
        }
    }
}

/// A results file on disk.
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
    format: RecordFormat,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: RecordFormat::default(),
        }
    }

    /// Set the encoding used by [`ResultStore::append`].
    pub fn with_format(mut self, format: RecordFormat) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one session as a single line, creating the file if needed.
    pub fn append(&self, session: &Session) -> Result<()> {
        let mut line = format_record(session, self.format)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AssessError::resource(&self.path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| AssessError::resource(&self.path, e))?;

        tracing::info!(
            "appended session {} ({} answers) to {}",
            session.display_time(),
            session.answers.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Parse every session and join it with `catalog` to compute category totals.
    pub fn read_all(&self, catalog: &Catalog) -> Result<Vec<ScoredSession>> {
        let content = read_file(&self.path)?;
        parse_results_str(&content, &self.path.display().to_string(), catalog)
    }

    /// Parse every session without consulting a catalog.
    pub fn read_sessions(&self) -> Result<Vec<(usize, Session)>> {
        let content = read_file(&self.path)?;
        parse_sessions_str(&content, &self.path.display().to_string())
    }
}

/// Encode a session without the trailing newline.
pub fn format_record(session: &Session, format: RecordFormat) -> Result<String> {
    match format {
        RecordFormat::Tokens => {
            let mut out = vec![format!("time={}", session.display_time())];
            // BTreeMap iteration keeps ids ascending.
            for (id, answer) in &session.answers {
                out.push(format!("{id}={answer}"));
            }
            Ok(out.join(" "))
        }
        RecordFormat::Json => serde_json::to_string(session)
            .map_err(|e| AssessError::format(format!("failed to encode session: {e}"))),
    }
}

/// Decode one non-blank results line in either format.
pub fn parse_record(line: &str) -> Result<Session> {
    let line = line.trim();
    if line.starts_with('{') {
        return serde_json::from_str(line)
            .map_err(|e| AssessError::format(format!("invalid JSON record: {e}")));
    }

    let mut timestamp: Option<NaiveDateTime> = None;
    let mut answers = std::collections::BTreeMap::new();

    for token in line.split_whitespace() {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| AssessError::format(format!("expected KEY=VALUE, got `{token}`")))?;

        if key == "time" {
            if timestamp.is_some() {
                return Err(AssessError::format("more than one `time` token"));
            }
            timestamp = Some(parse_timestamp(value)?);
        } else {
            let id: QuestionId = key
                .parse()
                .map_err(|_| AssessError::format(format!("question id `{key}` is not an integer")))?;
            let answer: Answer = value
                .parse()
                .map_err(|_| AssessError::format(format!("answer `{value}` is not an integer")))?;
            answers.insert(id, answer);
        }
    }

    let timestamp = timestamp.ok_or_else(|| AssessError::format("missing `time` token"))?;
    Ok(Session::new(timestamp, answers))
}

/// Parse a whole results file into `(line number, session)` pairs in file order.
///
/// Blank lines are skipped.
pub fn parse_sessions_str(content: &str, origin: &str) -> Result<Vec<(usize, Session)>> {
    let mut sessions = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            tracing::debug!("{origin}:{}: skipping blank line", i + 1);
            continue;
        }
        let session = parse_record(line).map_err(|e| e.at(origin, i + 1))?;
        sessions.push((i + 1, session));
    }
    Ok(sessions)
}

/// Parse a whole results file and compute category totals for each session.
pub fn parse_results_str(
    content: &str,
    origin: &str,
    catalog: &Catalog,
) -> Result<Vec<ScoredSession>> {
    let sessions = parse_sessions_str(content, origin)?
        .into_iter()
        .map(|(line, session)| ScoredSession::score(session, catalog).map_err(|e| e.at(origin, line)))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("read {} sessions from {origin}", sessions.len());
    Ok(sessions)
}
