// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::{BuildHost, Configuration, CoverageMode};

/// Command-line arguments for `builddag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "builddag",
    version,
    about = "Run build targets (clean, restore, compile, test, coverage, pack) in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// Targets to run. Defaults to the primary target of the pipeline.
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Path to the pipeline file (TOML). Defaults to `Builddag.toml`.
    ///
    /// Without this flag a missing `Builddag.toml` falls back to the
    /// built-in pipeline; a file given here must exist.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Build root. Defaults to the directory containing the pipeline file.
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,

    /// Configuration to build. Default is `debug` (local) or `release` (server).
    #[arg(long, value_enum, value_name = "MODE")]
    pub configuration: Option<Configuration>,

    /// Override build host detection.
    #[arg(long, value_enum, value_name = "HOST")]
    pub host: Option<BuildHost>,

    /// Coverage collection during tests (`auto` = server builds only).
    #[arg(long, value_enum, value_name = "MODE")]
    pub coverage: Option<CoverageMode>,

    /// Use this semantic version instead of asking the version command.
    #[arg(long, value_name = "SEMVER")]
    pub package_version: Option<String>,

    /// Print the execution plan without running anything.
    #[arg(long)]
    pub plan: bool,

    /// List all targets and their relations.
    #[arg(long)]
    pub list: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUILDDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
