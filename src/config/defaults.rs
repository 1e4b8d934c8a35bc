// src/config/defaults.rs

//! The built-in pipeline.

use std::collections::BTreeMap;

use crate::config::model::{RawConfigFile, TargetConfig};
use crate::errors::{BuilddagError, Result};

const DEFAULT_PIPELINE: &str = include_str!("default_pipeline.toml");

/// Parse the built-in pipeline file.
pub fn default_pipeline() -> Result<RawConfigFile> {
    toml::from_str(DEFAULT_PIPELINE).map_err(|e| {
        BuilddagError::ConfigError(format!("built-in pipeline is invalid: {e}"))
    })
}

/// Targets of the built-in pipeline.
pub fn default_targets() -> Result<BTreeMap<String, TargetConfig>> {
    Ok(default_pipeline()?.target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BuiltinAction;

    #[test]
    fn builtin_pipeline_parses() {
        let raw = default_pipeline().unwrap();
        assert_eq!(raw.build.primary, "Pack");
        assert_eq!(raw.target.len(), 6);

        let coverage = &raw.target["Coverage"];
        assert_eq!(coverage.action, Some(BuiltinAction::Coverage));
        assert_eq!(coverage.triggered_by, vec!["Test".to_string()]);

        let clean = &raw.target["Clean"];
        assert_eq!(clean.before, vec!["Restore".to_string()]);
        assert!(clean.depends_on.is_empty());
    }
}
