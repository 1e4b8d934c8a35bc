// src/actions/compile.rs

use anyhow::Result;

use crate::engine::{ActionEnv, BuildContext};
use crate::exec::template::Params;
use crate::version::VersionInfo;

pub const PLACEHOLDERS: &[&str] = &[
    "solution",
    "configuration",
    "root",
    "assembly_version",
    "file_version",
    "informational_version",
    "cpu_count",
    "node_reuse",
];

/// Template parameters for the compile command.
///
/// Node reuse keeps compiler worker processes alive between builds, which
/// only helps on a developer machine.
pub fn params(ctx: &BuildContext, version: &VersionInfo) -> Params {
    ctx.base_params()
        .with("assembly_version", &version.assembly_sem_ver)
        .with("file_version", &version.assembly_sem_file_ver)
        .with("informational_version", &version.informational_version)
        .with("cpu_count", ctx.settings.cpu_count)
        .with("node_reuse", ctx.settings.host.is_local())
}

pub async fn run(env: &ActionEnv<'_>) -> Result<()> {
    let ctx = env.ctx;
    let version = ctx.version().await?;
    let invocation = ctx.invocation(env.target, &ctx.tools.compile, &params(ctx, version))?;
    ctx.runner().run(&invocation).await
}
