// src/errors.rs

//! Crate-wide error type.
//!
//! Configuration problems (cycles, unknown targets, missing parameters) are
//! reported before any target runs. Action failures carry the partial
//! execution report so the caller can still print what happened.

use thiserror::Error;

use crate::engine::ExecutionReport;

#[derive(Error, Debug)]
pub enum BuilddagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("Cycle detected in target graph: {0}")]
    DagCycle(String),

    #[error("Target '{target}' failed")]
    TargetFailed {
        target: String,
        report: Box<ExecutionReport>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BuilddagError {
    /// The partial execution report, if this error came from a failed target.
    pub fn report(&self) -> Option<&ExecutionReport> {
        match self {
            BuilddagError::TargetFailed { report, .. } => Some(report),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BuilddagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_failure_names_its_cause_once() {
        let err = BuilddagError::TargetFailed {
            target: "Compile".to_string(),
            report: Box::default(),
            source: anyhow::anyhow!("`msbuild` exited with code 1").into(),
        };
        assert_eq!(err.to_string(), "Target 'Compile' failed");

        let chained = format!("{:?}", anyhow::Error::from(err));
        assert_eq!(chained.matches("exited with code 1").count(), 1, "{chained}");
    }
}
