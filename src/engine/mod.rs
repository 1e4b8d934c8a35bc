// src/engine/mod.rs

//! Execution engine for builddag.
//!
//! This module ties together:
//! - the execution plan from [`crate::dag`]
//! - the build context every action receives ([`context`])
//! - the sequential executor that runs the plan and stops on the first
//!   failure ([`executor`])
//! - the post-run check of declared outputs ([`produces`])

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Canonical target name type used throughout the engine.
pub type TargetName = String;

/// What happened to a planned target in one `run` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// The action ran and succeeded.
    Executed,
    /// Skipped: already executed earlier in this process.
    AlreadyExecuted,
    /// The action ran and failed; the run stopped here.
    Failed,
    /// Never reached because an earlier target failed.
    NotRun,
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetStatus::Executed => "succeeded",
            TargetStatus::AlreadyExecuted => "already executed",
            TargetStatus::Failed => "failed",
            TargetStatus::NotRun => "not run",
        };
        f.write_str(s)
    }
}

/// Per-target line of the execution report.
#[derive(Debug, Clone)]
pub struct TargetSummary {
    pub name: TargetName,
    pub status: TargetStatus,
    pub duration: Duration,
    /// Files matching the target's `produces` patterns after it ran.
    pub produced: Vec<PathBuf>,
}

/// Outcome of one `Executor::run` call.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    pub targets: Vec<TargetSummary>,
}

impl ExecutionReport {
    /// Names of targets executed by this call, in order.
    pub fn executed(&self) -> Vec<&str> {
        self.with_status(TargetStatus::Executed)
    }

    pub fn with_status(&self, status: TargetStatus) -> Vec<&str> {
        self.targets
            .iter()
            .filter(|t| t.status == status)
            .map(|t| t.name.as_str())
            .collect()
    }

    pub fn status_of(&self, name: &str) -> Option<TargetStatus> {
        self.targets.iter().find(|t| t.name == name).map(|t| t.status)
    }

    pub fn total_duration(&self) -> Duration {
        self.targets.iter().map(|t| t.duration).sum()
    }
}

pub mod context;
pub mod executor;
pub mod produces;

pub use context::{ActionEnv, BuildContext};
pub use executor::Executor;
