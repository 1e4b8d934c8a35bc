// src/exec/mod.rs

//! Process execution layer.
//!
//! Every external tool (compiler, test runner, report generator, packer,
//! version tool) is started through a [`ProcessRunner`], so tests can swap
//! in a fake that records command lines instead of spawning processes.
//!
//! - [`backend`] defines `Invocation` and the `ProcessRunner` trait.
//! - [`command`] is the real `tokio::process` implementation.
//! - [`template`] renders `{placeholder}` command templates.

pub mod backend;
pub mod command;
pub mod template;

pub use backend::{Invocation, ProcessRunner};
pub use command::ShellRunner;
