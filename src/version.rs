// src/version.rs

//! Version metadata for binaries and packages.
//!
//! Versions come either from a fixed semantic version or from a command that
//! prints GitVersion-style JSON. They are resolved at most once per process,
//! so every action tags its output with the same values.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::model::VersionSection;
use crate::exec::backend::{Invocation, ProcessRunner};

/// Resolved version strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionInfo {
    pub sem_ver: String,
    pub assembly_sem_ver: String,
    pub assembly_sem_file_ver: String,
    pub informational_version: String,
    #[serde(rename = "NuGetVersionV2")]
    pub nuget_version_v2: String,
}

impl VersionInfo {
    /// Derive every field from a semantic version string.
    ///
    /// Assembly versions use the numeric `major.minor.patch.0` form.
    pub fn from_semver(version: &str) -> Result<Self> {
        let parsed = semver::Version::parse(version.trim())
            .with_context(|| format!("invalid semantic version '{version}'"))?;
        let numeric = format!("{}.{}.{}.0", parsed.major, parsed.minor, parsed.patch);
        let full = parsed.to_string();
        Ok(Self {
            sem_ver: full.clone(),
            assembly_sem_ver: numeric.clone(),
            assembly_sem_file_ver: numeric,
            informational_version: full.clone(),
            nuget_version_v2: full,
        })
    }

    /// Parse the JSON printed by the version command.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing version command output")
    }
}

/// Where versions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    Fixed(String),
    Command(String),
}

impl VersionSource {
    /// A CLI override wins over `[version].fixed`, which wins over the command.
    pub fn from_config(section: &VersionSection, override_version: Option<&str>) -> Self {
        match override_version.or(section.fixed.as_deref()) {
            Some(v) => VersionSource::Fixed(v.to_string()),
            None => VersionSource::Command(section.command.clone()),
        }
    }
}

/// Lazily resolves a [`VersionSource`] once.
#[derive(Debug)]
pub struct VersionResolver {
    source: VersionSource,
    resolved: OnceCell<VersionInfo>,
}

impl VersionResolver {
    pub fn new(source: VersionSource) -> Self {
        Self {
            source,
            resolved: OnceCell::new(),
        }
    }

    pub async fn resolve(&self, runner: &dyn ProcessRunner, cwd: &Path) -> Result<&VersionInfo> {
        self.resolved
            .get_or_try_init(|| async {
                let info = match &self.source {
                    VersionSource::Fixed(v) => VersionInfo::from_semver(v)?,
                    VersionSource::Command(cmd) => {
                        let inv = Invocation::new("version", cmd.clone(), cwd);
                        let out = runner
                            .capture(&inv)
                            .await
                            .with_context(|| format!("running version command `{cmd}`"))?;
                        VersionInfo::from_json(&out)?
                    }
                };
                info!(
                    sem_ver = %info.sem_ver,
                    package_version = %info.nuget_version_v2,
                    "resolved build version"
                );
                Ok::<_, anyhow::Error>(info)
            })
            .await
    }
}
