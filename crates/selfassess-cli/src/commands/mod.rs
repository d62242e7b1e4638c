pub mod ask;
pub mod init;
pub mod plot;
pub mod report;
pub mod summary;
pub mod validate;

use anyhow::{Context, Result};

use selfassess_core::catalog::load_catalog;
use selfassess_core::config::{load_config_from, AssessConfig};
use selfassess_core::model::{Catalog, ScoredSession};
use selfassess_core::store::ResultStore;

use crate::PathOverrides;

/// Load the config and apply command-line path overrides.
pub fn resolve_config(paths: &PathOverrides) -> Result<AssessConfig> {
    let mut config = load_config_from(paths.config.as_deref()).context("failed to load config")?;
    if let Some(p) = &paths.questions {
        config.questions = p.clone();
    }
    if let Some(p) = &paths.scoring {
        config.scoring = p.clone();
    }
    if let Some(p) = &paths.results {
        config.results = p.clone();
    }
    Ok(config)
}

pub fn open_store(config: &AssessConfig) -> ResultStore {
    ResultStore::new(&config.results).with_format(config.record_format)
}

/// Catalog plus every stored session joined against it.
pub fn load_history(config: &AssessConfig) -> Result<(Catalog, Vec<ScoredSession>)> {
    let catalog = load_catalog(&config.questions).context("failed to load question catalog")?;
    let sessions = open_store(config)
        .read_all(&catalog)
        .context("failed to read results")?;
    tracing::debug!("{} sessions in history", sessions.len());
    Ok((catalog, sessions))
}
