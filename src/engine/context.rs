// src/engine/context.rs

//! Everything an action needs, constructed once at start-up.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::ci::CiSink;
use crate::config::model::ToolsSection;
use crate::config::settings::{BuildPaths, BuildSettings};
use crate::exec::backend::{Invocation, ProcessRunner};
use crate::exec::template::{render, Params};
use crate::project::Solution;
use crate::types::BuiltinAction;
use crate::version::{VersionInfo, VersionResolver};

/// Read-only build context shared by every action of a run.
///
/// Actions never read the environment directly; anything host-dependent has
/// already been resolved into [`BuildSettings`].
pub struct BuildContext {
    pub settings: BuildSettings,
    pub paths: BuildPaths,
    pub tools: ToolsSection,
    version: VersionResolver,
    runner: Arc<dyn ProcessRunner>,
    sink: Arc<dyn CiSink>,
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("settings", &self.settings)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl BuildContext {
    pub fn new(
        settings: BuildSettings,
        paths: BuildPaths,
        tools: ToolsSection,
        version: VersionResolver,
        runner: Arc<dyn ProcessRunner>,
        sink: Arc<dyn CiSink>,
    ) -> Self {
        Self {
            settings,
            paths,
            tools,
            version,
            runner,
            sink,
        }
    }

    pub fn runner(&self) -> &dyn ProcessRunner {
        self.runner.as_ref()
    }

    pub fn sink(&self) -> &dyn CiSink {
        self.sink.as_ref()
    }

    /// Versions for this run; resolved on first use and then reused.
    pub async fn version(&self) -> Result<&VersionInfo> {
        self.version.resolve(self.runner.as_ref(), &self.paths.root).await
    }

    /// Load the solution descriptor.
    pub fn solution(&self) -> Result<Solution> {
        let path = self
            .paths
            .solution
            .as_ref()
            .ok_or_else(|| anyhow!("no solution descriptor found in {}", self.paths.root.display()))?;
        Solution::load(path)
    }

    /// Parameters every template may use.
    pub fn base_params(&self) -> Params {
        let mut params = Params::new()
            .with("root", self.paths.root.display())
            .with("configuration", self.settings.configuration);
        if let Some(sln) = &self.paths.solution {
            params.set("solution", sln.display());
        }
        params
    }

    /// Render `template` and wrap it in an invocation run from the build root.
    pub fn invocation(&self, label: &str, template: &str, params: &Params) -> Result<Invocation> {
        let command = render(template, params)?;
        Ok(Invocation::new(label, command, &self.paths.root))
    }
}

/// Per-target view handed to an action.
#[derive(Debug, Clone, Copy)]
pub struct ActionEnv<'a> {
    pub ctx: &'a BuildContext,
    /// Name of the target running the action.
    pub target: &'a str,
    /// Built-in actions that already completed in this process.
    pub completed_actions: &'a HashSet<BuiltinAction>,
}

impl<'a> ActionEnv<'a> {
    pub fn has_completed(&self, action: BuiltinAction) -> bool {
        self.completed_actions.contains(&action)
    }
}
