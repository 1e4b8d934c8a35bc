// src/config/mod.rs

//! Pipeline configuration for builddag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Provide the built-in pipeline used when no file exists (`defaults.rs`).
//! - Load a pipeline file from disk (`loader.rs`).
//! - Validate invariants like acyclicity and template placeholders
//!   (`validate.rs`).
//! - Resolve the per-run settings and paths once at start-up (`settings.rs`).

pub mod defaults;
pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{
    BuildSection, ConfigFile, PathsSection, RawConfigFile, TargetConfig, ToolsSection,
    VersionSection,
};
pub use settings::{BuildPaths, BuildSettings, SettingsOverrides};
