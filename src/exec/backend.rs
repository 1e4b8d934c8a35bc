// src/exec/backend.rs

//! Pluggable process runner abstraction.
//!
//! Actions talk to a `ProcessRunner` instead of spawning processes
//! themselves. Production code uses [`super::ShellRunner`]; tests can
//! provide an implementation that records invocations and reports success
//! or failure without touching the OS.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use anyhow::Result;

/// One external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Short label for logs (usually the target name).
    pub label: String,
    /// Full command line, run through the platform shell.
    pub command: String,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(label: impl Into<String>, command: impl Into<String>, cwd: &Path) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
            cwd: cwd.to_path_buf(),
        }
    }
}

/// Future returned by [`ProcessRunner`] methods.
pub type RunFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Trait abstracting how external commands are executed.
pub trait ProcessRunner: Send + Sync {
    /// Run the command to completion, streaming its output to the log.
    ///
    /// A non-zero exit status is an error.
    fn run<'a>(&'a self, invocation: &'a Invocation) -> RunFuture<'a, ()>;

    /// Run the command to completion and return its stdout.
    ///
    /// A non-zero exit status is an error.
    fn capture<'a>(&'a self, invocation: &'a Invocation) -> RunFuture<'a, String>;
}
