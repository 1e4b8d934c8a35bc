use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use builddag::ci::CiSink;
use builddag::exec::backend::{Invocation, ProcessRunner, RunFuture};

type Hook = Box<dyn Fn(&Invocation) + Send + Sync>;

/// A fake process runner that:
/// - records every invocation instead of spawning a process
/// - fails invocations whose command contains a configured substring
/// - returns canned stdout from `capture`
/// - optionally runs a hook per invocation (e.g. to create the files the
///   real tool would write)
pub struct FakeRunner {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    fail_on: Vec<String>,
    capture_output: String,
    hook: Option<Hook>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(Mutex::new(Vec::new())),
            fail_on: Vec::new(),
            capture_output: String::new(),
            hook: None,
        }
    }

    /// Fail any command containing `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on.push(needle.to_string());
        self
    }

    pub fn with_capture_output(mut self, output: &str) -> Self {
        self.capture_output = output.to_string();
        self
    }

    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Invocation) + Send + Sync + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.invocations().into_iter().map(|i| i.command).collect()
    }

    /// Invocation labels in order; for command targets this is the target name.
    pub fn labels(&self) -> Vec<String> {
        self.invocations().into_iter().map(|i| i.label).collect()
    }

    fn record(&self, invocation: &Invocation) -> anyhow::Result<()> {
        self.invocations.lock().unwrap().push(invocation.clone());
        if let Some(hook) = &self.hook {
            hook(invocation);
        }
        if self.fail_on.iter().any(|n| invocation.command.contains(n)) {
            anyhow::bail!("`{}` exited with code 1", invocation.command);
        }
        Ok(())
    }
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for FakeRunner {
    fn run<'a>(&'a self, invocation: &'a Invocation) -> RunFuture<'a, ()> {
        Box::pin(async move { self.record(invocation) })
    }

    fn capture<'a>(&'a self, invocation: &'a Invocation) -> RunFuture<'a, String> {
        Box::pin(async move {
            self.record(invocation)?;
            Ok(self.capture_output.clone())
        })
    }
}

/// One call received by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Published {
    TestResults { title: String, file: PathBuf },
    Coverage { summary_file: PathBuf, report_dir: PathBuf },
}

/// CI sink that remembers what was published.
#[derive(Default)]
pub struct RecordingSink {
    published: Mutex<Vec<Published>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }
}

impl CiSink for RecordingSink {
    fn publish_test_results(&self, title: &str, file: &Path) {
        self.published.lock().unwrap().push(Published::TestResults {
            title: title.to_string(),
            file: file.to_path_buf(),
        });
    }

    fn publish_code_coverage(&self, summary_file: &Path, report_dir: &Path) {
        self.published.lock().unwrap().push(Published::Coverage {
            summary_file: summary_file.to_path_buf(),
            report_dir: report_dir.to_path_buf(),
        });
    }
}
