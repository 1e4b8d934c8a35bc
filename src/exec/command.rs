// src/exec/command.rs

//! Real process runner built on `tokio::process`.

use std::process::Stdio;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::exec::backend::{Invocation, ProcessRunner, RunFuture};

/// Runs invocations through `sh -c` (or `cmd /C` on Windows).
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

/// Build a shell command appropriate for the platform.
fn shell_command(invocation: &Invocation) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&invocation.command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&invocation.command);
        c
    };
    cmd.current_dir(&invocation.cwd).kill_on_drop(true);
    cmd
}

impl ProcessRunner for ShellRunner {
    fn run<'a>(&'a self, invocation: &'a Invocation) -> RunFuture<'a, ()> {
        Box::pin(run_streaming(invocation))
    }

    fn capture<'a>(&'a self, invocation: &'a Invocation) -> RunFuture<'a, String> {
        Box::pin(run_captured(invocation))
    }
}

async fn run_streaming(invocation: &Invocation) -> Result<()> {
    info!(
        label = %invocation.label,
        cmd = %invocation.command,
        "starting process"
    );

    let mut cmd = shell_command(invocation);
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for '{}'", invocation.label))?;

    // Always consume stderr so buffers don't fill.
    let stderr_task = child.stderr.take().map(|stderr| {
        let label = invocation.label.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!(label = %label, "{}", line);
            }
        })
    });

    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .with_context(|| format!("reading stdout of '{}'", invocation.label))?
        {
            info!(label = %invocation.label, "{}", line);
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of '{}'", invocation.label))?;

    if let Some(task) = stderr_task {
        let _ = task.await;
    }

    let code = status.code().unwrap_or(-1);
    info!(
        label = %invocation.label,
        exit_code = code,
        success = status.success(),
        "process exited"
    );

    if !status.success() {
        bail!("`{}` exited with code {}", invocation.command, code);
    }
    Ok(())
}

async fn run_captured(invocation: &Invocation) -> Result<String> {
    debug!(
        label = %invocation.label,
        cmd = %invocation.command,
        "capturing process output"
    );

    let output = shell_command(invocation)
        .stdin(Stdio::null())
        .output()
        .await
        .with_context(|| format!("spawning process for '{}'", invocation.label))?;

    for line in String::from_utf8_lossy(&output.stderr).lines() {
        debug!(label = %invocation.label, "stderr: {}", line);
    }

    if !output.status.success() {
        bail!(
            "`{}` exited with code {}",
            invocation.command,
            output.status.code().unwrap_or(-1)
        );
    }

    String::from_utf8(output.stdout)
        .with_context(|| format!("stdout of '{}' is not UTF-8", invocation.label))
}
