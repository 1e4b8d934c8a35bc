// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::defaults::default_pipeline;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a pipeline file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a pipeline file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (`serde` defaults, built-in targets when none are
///   declared).
/// - Checks for unknown references, cycles, bad templates.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the pipeline file, falling back to the built-in pipeline when the
/// file does not exist and was not explicitly requested.
pub fn load_or_default(path: impl AsRef<Path>, explicit: bool) -> Result<ConfigFile> {
    let path = path.as_ref();
    if !explicit && !path.exists() {
        info!(path = %path.display(), "no pipeline file found; using built-in pipeline");
        return ConfigFile::try_from(default_pipeline()?);
    }
    load_and_validate(path)
}

/// Default pipeline file location: `Builddag.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Builddag.toml")
}
