#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use builddag::ci::CiSink;
use builddag::config::{
    BuildPaths, BuildSection, BuildSettings, ConfigFile, PathsSection, RawConfigFile,
    SettingsOverrides, TargetConfig, ToolsSection,
};
use builddag::engine::BuildContext;
use builddag::errors::Result;
use builddag::exec::ProcessRunner;
use builddag::types::{BuildHost, BuiltinAction, Configuration, CoverageMode};
use builddag::version::{VersionResolver, VersionSource};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn primary(mut self, name: &str) -> Self {
        self.config.build.primary = name.to_string();
        self
    }

    pub fn with_target(mut self, name: &str, target: TargetConfig) -> Self {
        self.config.target.insert(name.to_string(), target);
        self
    }

    pub fn with_tools(mut self, tools: ToolsSection) -> Self {
        self.config.tools = tools;
        self
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TargetConfig`.
#[derive(Default)]
pub struct TargetConfigBuilder {
    target: TargetConfig,
}

impl TargetConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target running a shell command.
    pub fn cmd(cmd: &str) -> Self {
        let mut b = Self::new();
        b.target.cmd = Some(cmd.to_string());
        b
    }

    /// Target running a built-in action.
    pub fn action(action: BuiltinAction) -> Self {
        let mut b = Self::new();
        b.target.action = Some(action);
        b
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.target.depends_on.push(dep.to_string());
        self
    }

    pub fn before(mut self, other: &str) -> Self {
        self.target.before.push(other.to_string());
        self
    }

    pub fn after(mut self, other: &str) -> Self {
        self.target.after.push(other.to_string());
        self
    }

    pub fn triggered_by(mut self, trigger: &str) -> Self {
        self.target.triggered_by.push(trigger.to_string());
        self
    }

    pub fn produces(mut self, pattern: &str) -> Self {
        self.target.produces.push(pattern.to_string());
        self
    }

    pub fn build(self) -> TargetConfig {
        self.target
    }
}

/// Builder for a `BuildContext` rooted in a test directory.
///
/// Settings are resolved against the given fake environment instead of the
/// process environment.
pub struct ContextBuilder {
    root: PathBuf,
    build: BuildSection,
    overrides: SettingsOverrides,
    paths: PathsSection,
    tools: ToolsSection,
    version: VersionSource,
    env: Vec<(String, String)>,
}

impl ContextBuilder {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            build: BuildSection::default(),
            overrides: SettingsOverrides {
                host: Some(BuildHost::Local),
                ..Default::default()
            },
            paths: PathsSection::default(),
            tools: ToolsSection::default(),
            version: VersionSource::Fixed("1.0.0".to_string()),
            env: Vec::new(),
        }
    }

    pub fn host(mut self, host: BuildHost) -> Self {
        self.overrides.host = Some(host);
        self
    }

    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.overrides.configuration = Some(configuration);
        self
    }

    pub fn coverage(mut self, mode: CoverageMode) -> Self {
        self.overrides.coverage = Some(mode);
        self
    }

    pub fn solution(mut self, rel: &str) -> Self {
        self.paths.solution = Some(rel.to_string());
        self
    }

    pub fn fixed_version(mut self, version: &str) -> Self {
        self.version = VersionSource::Fixed(version.to_string());
        self
    }

    pub fn version_command(mut self, cmd: &str) -> Self {
        self.version = VersionSource::Command(cmd.to_string());
        self
    }

    pub fn tools(mut self, tools: ToolsSection) -> Self {
        self.tools = tools;
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn build(self, runner: Arc<dyn ProcessRunner>, sink: Arc<dyn CiSink>) -> BuildContext {
        let env = self.env;
        let settings = BuildSettings::resolve(&self.build, &self.overrides, |key| {
            env.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        });
        let paths = BuildPaths::resolve(&self.root, &self.paths, settings.configuration)
            .expect("Failed to resolve build paths");
        BuildContext::new(
            settings,
            paths,
            self.tools,
            VersionResolver::new(self.version),
            runner,
            sink,
        )
    }
}
