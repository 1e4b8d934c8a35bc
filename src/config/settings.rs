// src/config/settings.rs

//! Per-run settings and paths.
//!
//! Everything that depends on the environment (server detection, CI stage
//! name, processor count) is read here, once, and handed to the actions as
//! plain values.

use std::path::{Path, PathBuf};

use crate::config::model::{BuildSection, PathsSection};
use crate::errors::Result;
use crate::exec::template::{render, Params};
use crate::project::find_solution;
use crate::types::{BuildHost, Configuration, CoverageMode};

/// Values given on the command line that win over the pipeline file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub configuration: Option<Configuration>,
    pub host: Option<BuildHost>,
    pub coverage: Option<CoverageMode>,
    pub package_version: Option<String>,
}

/// Resolved settings for one process run.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub configuration: Configuration,
    pub host: BuildHost,
    /// Collect coverage data during tests.
    pub collect_coverage: bool,
    /// Embed source-link metadata (server builds with coverage on).
    pub source_link: bool,
    /// Processor count handed to the compiler.
    pub cpu_count: usize,
    /// Publish results with Azure Pipelines logging commands.
    pub azure_pipelines: bool,
    /// Display name of the CI stage, used in published result titles.
    pub ci_stage: Option<String>,
    pub test_project_suffix: String,
    pub clean_globs: Vec<String>,
}

impl BuildSettings {
    /// Resolve settings from the `[build]` section, CLI overrides and an
    /// environment lookup.
    pub fn resolve<F>(build: &BuildSection, overrides: &SettingsOverrides, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = overrides
            .host
            .or(build.host)
            .unwrap_or_else(|| BuildHost::detect(&lookup));

        let configuration = overrides
            .configuration
            .or(build.configuration)
            .unwrap_or_else(|| Configuration::default_for(host));

        let coverage = overrides.coverage.unwrap_or(build.coverage);
        let collect_coverage = coverage.is_enabled(host);

        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            configuration,
            host,
            collect_coverage,
            source_link: collect_coverage && host.is_server(),
            cpu_count,
            azure_pipelines: lookup("TF_BUILD").is_some(),
            ci_stage: lookup("SYSTEM_STAGEDISPLAYNAME").filter(|s| !s.trim().is_empty()),
            test_project_suffix: build.test_project_suffix.clone(),
            clean_globs: build.clean_globs.clone(),
        }
    }

    /// Resolve settings against the real process environment.
    pub fn from_env(build: &BuildSection, overrides: &SettingsOverrides) -> Self {
        Self::resolve(build, overrides, |key| std::env::var(key).ok())
    }
}

/// Absolute locations used by the actions.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    pub root: PathBuf,
    pub source: PathBuf,
    pub tests: PathBuf,
    pub artifacts: PathBuf,
    pub test_results: PathBuf,
    pub coverage_report: PathBuf,
    pub coverage_archive: PathBuf,
    pub test_output: PathBuf,
    pub descriptors: PathBuf,
    /// Solution descriptor, if configured or found in the root.
    pub solution: Option<PathBuf>,
}

impl BuildPaths {
    pub fn resolve(
        root: &Path,
        paths: &PathsSection,
        configuration: Configuration,
    ) -> Result<Self> {
        let test_output = render(
            &paths.test_output,
            &Params::new().with("configuration", configuration),
        )?;

        let solution = match &paths.solution {
            Some(sln) => Some(root.join(sln)),
            None => find_solution(root)?,
        };

        Ok(Self {
            root: root.to_path_buf(),
            source: root.join(&paths.source),
            tests: root.join(&paths.tests),
            artifacts: root.join(&paths.artifacts),
            test_results: root.join(&paths.test_results),
            coverage_report: root.join(&paths.coverage_report),
            coverage_archive: root.join(&paths.coverage_archive),
            test_output: root.join(test_output),
            descriptors: root.join(&paths.descriptors),
            solution,
        })
    }
}
