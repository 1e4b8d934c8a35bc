// src/types.rs

//! Small shared enums: build configuration, build host, coverage mode and
//! the built-in target actions.

use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

/// Build configuration handed to the compiler, test runner and packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Configuration {
    Debug,
    Release,
}

impl Configuration {
    /// Default configuration for a host: `Debug` locally, `Release` on a server.
    pub fn default_for(host: BuildHost) -> Self {
        match host {
            BuildHost::Local => Configuration::Debug,
            BuildHost::Server => Configuration::Release,
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Configuration::Debug => f.write_str("Debug"),
            Configuration::Release => f.write_str("Release"),
        }
    }
}

/// Whether the build runs on a developer machine or a CI server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildHost {
    Local,
    Server,
}

/// Environment variables whose presence marks a CI server build.
pub const SERVER_ENV_VARS: &[&str] = &[
    "TF_BUILD",
    "CI",
    "GITHUB_ACTIONS",
    "TEAMCITY_VERSION",
    "JENKINS_URL",
];

impl BuildHost {
    /// Detect the host from an environment lookup.
    ///
    /// Takes the lookup as a closure so detection can be tested without
    /// touching the process environment.
    pub fn detect<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let on_server = SERVER_ENV_VARS
            .iter()
            .any(|var| lookup(var).is_some_and(|v| !v.trim().is_empty()));
        if on_server {
            BuildHost::Server
        } else {
            BuildHost::Local
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, BuildHost::Server)
    }

    pub fn is_local(&self) -> bool {
        matches!(self, BuildHost::Local)
    }
}

impl fmt::Display for BuildHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildHost::Local => f.write_str("local"),
            BuildHost::Server => f.write_str("server"),
        }
    }
}

/// Whether the test step collects coverage data.
///
/// - `Auto` (default): collect on server builds only.
/// - `On` / `Off`: explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CoverageMode {
    #[default]
    Auto,
    On,
    Off,
}

impl CoverageMode {
    pub fn is_enabled(&self, host: BuildHost) -> bool {
        match self {
            CoverageMode::Auto => host.is_server(),
            CoverageMode::On => true,
            CoverageMode::Off => false,
        }
    }
}

/// Built-in actions a target can run (`action = "..."` in the pipeline file).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinAction {
    Clean,
    Restore,
    Compile,
    Test,
    Coverage,
    Pack,
}

impl BuiltinAction {
    /// Whether the action needs a solution descriptor to run.
    pub fn needs_solution(&self) -> bool {
        matches!(
            self,
            BuiltinAction::Restore
                | BuiltinAction::Compile
                | BuiltinAction::Test
                | BuiltinAction::Pack
        )
    }
}

impl fmt::Display for BuiltinAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuiltinAction::Clean => "clean",
            BuiltinAction::Restore => "restore",
            BuiltinAction::Compile => "compile",
            BuiltinAction::Test => "test",
            BuiltinAction::Coverage => "coverage",
            BuiltinAction::Pack => "pack",
        };
        f.write_str(s)
    }
}
