// src/actions/pack.rs

use std::fs;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::engine::{ActionEnv, BuildContext};
use crate::exec::backend::Invocation;
use crate::patterns::files_with_extension;
use crate::types::BuiltinAction;

pub const DESCRIPTOR_PLACEHOLDERS: &[&str] = &[
    "descriptor",
    "artifacts_dir",
    "package_version",
    "configuration",
    "build_flag",
    "root",
    "solution",
];

pub const PROJECT_PLACEHOLDERS: &[&str] = &[
    "solution",
    "artifacts_dir",
    "package_version",
    "configuration",
    "root",
];

/// Pack invocations for this build.
///
/// With `*.nuspec` descriptors present, one invocation per descriptor;
/// `compiled` tells whether the packer can reuse this run's build output or
/// must build itself. Otherwise one invocation packing the solution.
pub fn pack_invocations(
    ctx: &BuildContext,
    label: &str,
    package_version: &str,
    compiled: bool,
) -> Result<Vec<Invocation>> {
    let artifacts = ctx.paths.artifacts.display();
    let descriptors = files_with_extension(&ctx.paths.descriptors, "nuspec")?;

    if descriptors.is_empty() {
        debug!(dir = %ctx.paths.descriptors.display(), "no package descriptors; packing the solution");
        let params = ctx
            .base_params()
            .with("artifacts_dir", &artifacts)
            .with("package_version", package_version);
        return Ok(vec![ctx.invocation(label, &ctx.tools.pack_project, &params)?]);
    }

    let build_flag = if compiled { "" } else { " -Build" };
    descriptors
        .iter()
        .map(|descriptor| {
            let params = ctx
                .base_params()
                .with("descriptor", descriptor.display())
                .with("artifacts_dir", &artifacts)
                .with("package_version", package_version)
                .with("build_flag", build_flag);
            ctx.invocation(label, &ctx.tools.pack_descriptor, &params)
        })
        .collect()
}

pub async fn run(env: &ActionEnv<'_>) -> Result<()> {
    let ctx = env.ctx;
    let version = ctx.version().await?;
    fs::create_dir_all(&ctx.paths.artifacts)
        .with_context(|| format!("creating {}", ctx.paths.artifacts.display()))?;

    let invocations = pack_invocations(
        ctx,
        env.target,
        &version.nuget_version_v2,
        env.has_completed(BuiltinAction::Compile),
    )?;
    super::run_all(env, &invocations).await?;

    info!(
        packages = invocations.len(),
        version = %version.nuget_version_v2,
        "packing finished"
    );
    Ok(())
}
