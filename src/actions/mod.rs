// src/actions/mod.rs

//! Target actions.
//!
//! Each built-in action turns the [`BuildContext`](crate::engine::BuildContext)
//! into one or more tool invocations and hands them to the process runner.
//! Every module exports the placeholder names its command templates may use;
//! templates are checked against them when the pipeline file is loaded.

pub mod clean;
pub mod compile;
pub mod coverage;
pub mod pack;
pub mod restore;

use anyhow::Result;
use tracing::debug;

use crate::dag::TargetAction;
use crate::engine::ActionEnv;
use crate::exec::backend::Invocation;
use crate::types::BuiltinAction;

/// Run the action of one target.
pub async fn execute(action: &TargetAction, env: &ActionEnv<'_>) -> Result<()> {
    match action {
        TargetAction::None => {
            debug!(target_name = env.target, "aggregate target; nothing to run");
            Ok(())
        }
        TargetAction::Builtin(builtin) => run_builtin(*builtin, env).await,
        TargetAction::Command(cmd) => {
            let invocation = Invocation::new(env.target, cmd.clone(), &env.ctx.paths.root);
            env.ctx.runner().run(&invocation).await
        }
    }
}

async fn run_builtin(action: BuiltinAction, env: &ActionEnv<'_>) -> Result<()> {
    match action {
        BuiltinAction::Clean => clean::run(env),
        BuiltinAction::Restore => restore::run(env).await,
        BuiltinAction::Compile => compile::run(env).await,
        BuiltinAction::Test => test::run(env).await,
        BuiltinAction::Coverage => coverage::run(env).await,
        BuiltinAction::Pack => pack::run(env).await,
    }
}

/// Run invocations in order, stopping at the first failure.
async fn run_all(env: &ActionEnv<'_>, invocations: &[Invocation]) -> Result<()> {
    for invocation in invocations {
        env.ctx.runner().run(invocation).await?;
    }
    Ok(())
}
