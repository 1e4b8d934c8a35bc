// src/actions/clean.rs

use std::fs;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::engine::ActionEnv;
use crate::patterns::{build_globset, find_matching_dirs};

/// Remove build output under the source and tests directories and start
/// from an empty artifacts directory.
pub fn run(env: &ActionEnv<'_>) -> Result<()> {
    let ctx = env.ctx;
    let globs = build_globset(&ctx.settings.clean_globs).context("building clean globs")?;

    let mut removed = 0usize;
    for base in [&ctx.paths.source, &ctx.paths.tests] {
        for dir in find_matching_dirs(base, &globs)? {
            debug!(dir = %dir.display(), "removing");
            fs::remove_dir_all(&dir).with_context(|| format!("removing {}", dir.display()))?;
            removed += 1;
        }
    }

    let artifacts = &ctx.paths.artifacts;
    if artifacts.exists() {
        fs::remove_dir_all(artifacts)
            .with_context(|| format!("removing {}", artifacts.display()))?;
    }
    fs::create_dir_all(artifacts).with_context(|| format!("creating {}", artifacts.display()))?;

    info!(removed, artifacts = %artifacts.display(), "clean finished");
    Ok(())
}
