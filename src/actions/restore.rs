// src/actions/restore.rs

use anyhow::Result;

use crate::engine::ActionEnv;

pub const PLACEHOLDERS: &[&str] = &["solution", "configuration", "root"];

/// Fetch package dependencies for the solution.
pub async fn run(env: &ActionEnv<'_>) -> Result<()> {
    let ctx = env.ctx;
    let invocation = ctx.invocation(env.target, &ctx.tools.restore, &ctx.base_params())?;
    ctx.runner().run(&invocation).await
}
