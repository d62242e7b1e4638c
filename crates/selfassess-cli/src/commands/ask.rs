//! The `selfassess ask` command.

use std::io;

use anyhow::{Context, Result};

use selfassess_core::catalog::{load_catalog, load_scoring};
use selfassess_core::collect::{run_questionnaire, PromptAnswers, RandomAnswers};
use selfassess_core::model::ScoringKey;
use selfassess_core::traits::AnswerSource;
use selfassess_core::AssessError;

use crate::PathOverrides;

pub fn execute(paths: &PathOverrides, random: bool, seed: Option<u64>) -> Result<()> {
    let config = super::resolve_config(paths)?;
    let catalog = load_catalog(&config.questions).context("failed to load question catalog")?;
    anyhow::ensure!(
        !catalog.is_empty(),
        "question catalog {} is empty",
        config.questions.display()
    );

    // The random source never shows labels, so an absent key is fine there.
    // A key that exists but does not parse is still an error.
    let scoring = match load_scoring(&config.scoring) {
        Ok(key) => key,
        Err(e) if random && is_not_found(&e) => {
            tracing::warn!("continuing without scoring key: {e}");
            ScoringKey::default()
        }
        Err(e) => return Err(e).context("failed to load scoring key"),
    };

    let mut source: Box<dyn AnswerSource> = if random {
        match seed {
            Some(seed) => Box::new(RandomAnswers::with_seed(seed)),
            None => Box::new(RandomAnswers::new()),
        }
    } else {
        Box::new(PromptAnswers::new(io::stdin().lock(), io::stdout()))
    };

    let scored = run_questionnaire(&catalog, &scoring, source.as_mut())?;

    let store = super::open_store(&config);
    store.append(&scored.session)?;

    println!(
        "\nSession {} saved to {}",
        scored.session.display_time(),
        store.path().display()
    );
    for (category, total) in &scored.category_totals {
        println!("  {:<24} {total}", config.theme().display_name(category));
    }

    Ok(())
}

fn is_not_found(err: &AssessError) -> bool {
    matches!(
        err.root(),
        AssessError::Resource { source, .. } if source.kind() == io::ErrorKind::NotFound
    )
}
