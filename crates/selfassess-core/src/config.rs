//! Configuration: file locations, record format, and the category theme.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::read_file;
use crate::error::{AssessError, Result};
use crate::model::{Answer, LOW_SCORE_THRESHOLD};
use crate::store::RecordFormat;

/// Display settings for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    /// Name shown in report titles and chart legends.
    pub display_name: String,
    /// Any SVG color, typically `#RRGGBB`.
    pub color: String,
}

/// Category tag → display settings.
///
/// Categories without an entry display their raw tag and take a color from
/// [`FALLBACK_PALETTE`] picked by a hash of the tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme {
    pub categories: BTreeMap<String, CategoryStyle>,
}

/// Colors handed out to categories the theme does not name.
pub const FALLBACK_PALETTE: &[&str] = &["#8172B2", "#CCB974", "#64B5CD", "#937860", "#DA8BC3"];

impl Theme {
    /// A theme with no named categories.
    pub fn empty() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }

    pub fn with_category(
        mut self,
        tag: impl Into<String>,
        display_name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        self.categories.insert(
            tag.into(),
            CategoryStyle {
                display_name: display_name.into(),
                color: color.into(),
            },
        );
        self
    }

    pub fn display_name<'a>(&'a self, tag: &'a str) -> &'a str {
        self.categories
            .get(tag)
            .map(|s| s.display_name.as_str())
            .unwrap_or(tag)
    }

    pub fn color(&self, tag: &str) -> &str {
        if let Some(style) = self.categories.get(tag) {
            return &style.color;
        }
        let index = tag.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
        FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()]
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.categories.contains_key(tag)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::empty()
            .with_category("mental", "Mental", "#4C72B0")
            .with_category("technique", "Technique and Tactics", "#55A868")
            .with_category("physical", "Physical", "#C44E52")
    }
}

/// Top-level selfassess configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessConfig {
    /// Question catalog file.
    #[serde(default = "default_questions")]
    pub questions: PathBuf,
    /// Scoring key file.
    #[serde(default = "default_scoring")]
    pub scoring: PathBuf,
    /// Results history file.
    #[serde(default = "default_results")]
    pub results: PathBuf,
    /// Directory charts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Encoding for newly appended sessions.
    #[serde(default)]
    pub record_format: RecordFormat,
    /// Answers at or below this are reported as low-scoring.
    #[serde(default = "default_threshold")]
    pub low_score_threshold: Answer,
    /// Category display names and colors.
    #[serde(default)]
    pub categories: Theme,
}

fn default_questions() -> PathBuf {
    PathBuf::from("questions.txt")
}
fn default_scoring() -> PathBuf {
    PathBuf::from("scoring.txt")
}
fn default_results() -> PathBuf {
    PathBuf::from("results.txt")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_threshold() -> Answer {
    LOW_SCORE_THRESHOLD
}

impl Default for AssessConfig {
    fn default() -> Self {
        Self {
            questions: default_questions(),
            scoring: default_scoring(),
            results: default_results(),
            output_dir: default_output_dir(),
            record_format: RecordFormat::default(),
            low_score_threshold: default_threshold(),
            categories: Theme::default(),
        }
    }
}

impl AssessConfig {
    pub fn theme(&self) -> &Theme {
        &self.categories
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    // Substituted values are not rescanned.
    let mut cursor = 0;
    while let Some(offset) = result[cursor..].find("${") {
        let start = cursor + offset;
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
            cursor = start + value.len();
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `selfassess.toml` in the current directory
/// 2. `~/.config/selfassess/config.toml`
///
/// Falls back to defaults when neither exists.
pub fn load_config() -> Result<AssessConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AssessConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            return Err(AssessError::resource(
                p,
                std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
            ));
        }
    } else {
        let local = PathBuf::from("selfassess.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = read_file(&path)?;
            let config = parse_config_str(&content, &path)?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => AssessConfig::default(),
    };

    config.questions = resolve_path(&config.questions);
    config.scoring = resolve_path(&config.scoring);
    config.results = resolve_path(&config.results);
    config.output_dir = resolve_path(&config.output_dir);

    Ok(config)
}

/// Parse config TOML. `path` is only used in error messages.
pub fn parse_config_str(content: &str, path: &Path) -> Result<AssessConfig> {
    toml::from_str::<AssessConfig>(content).map_err(|e| AssessError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("selfassess"))
}
