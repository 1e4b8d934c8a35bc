// tests/default_pipeline.rs
//
// Runs the built-in Clean/Restore/Compile/Test/Coverage/Pack pipeline
// against a fake process runner.

mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use builddag::config::defaults::default_pipeline;
use builddag::config::ConfigFile;
use builddag::engine::TargetStatus;
use builddag::errors::BuilddagError;
use builddag::exec::Invocation;
use builddag::types::CoverageMode;
use builddag_test_utils::builders::ContextBuilder;
use builddag_test_utils::fake_runner::{FakeRunner, Published, RecordingSink};
use builddag_test_utils::fixtures::SolutionFixture;
use builddag_test_utils::{init_tracing, with_timeout};
use common::{executor_for, names};

const GITVERSION_JSON: &str = r#"{
  "SemVer": "1.3.0-alpha.7",
  "AssemblySemVer": "1.3.0.0",
  "AssemblySemFileVer": "1.3.0.0",
  "InformationalVersion": "1.3.0-alpha.7+Sha.abc123",
  "NuGetVersionV2": "1.3.0-alpha0007"
}"#;

fn builtin_config() -> ConfigFile {
    ConfigFile::try_from(default_pipeline().unwrap()).unwrap()
}

fn fixture() -> SolutionFixture {
    SolutionFixture::new()
        .project("Lib", &["net8.0"])
        .project("Lib.Tests", &["net8.0"])
        .write()
}

/// Simulates the files the real tools would write.
fn tool_outputs(root: &Path) -> impl Fn(&Invocation) + Send + Sync + 'static {
    let root: PathBuf = root.to_path_buf();
    move |inv: &Invocation| {
        let results = root.join("artifacts/test-results");
        if inv.command.starts_with("dotnet test") {
            fs::create_dir_all(&results).unwrap();
            fs::write(results.join("Lib.Tests.trx"), "<TestRun/>").unwrap();
            if inv.command.contains("CollectCoverage") {
                fs::write(results.join("Lib.Tests.xml"), "<coverage/>").unwrap();
            }
        } else if inv.command.starts_with("reportgenerator") {
            let report = root.join("artifacts/coverage-report");
            fs::create_dir_all(&report).unwrap();
            fs::write(report.join("index.html"), "<html/>").unwrap();
        } else if inv.command.starts_with("dotnet pack") {
            fs::write(root.join("artifacts/Lib.1.3.0-alpha0007.nupkg"), "").unwrap();
        }
    }
}

#[tokio::test]
async fn primary_target_runs_the_whole_pipeline_in_order() {
    init_tracing();
    let fx = fixture();
    let runner = Arc::new(
        FakeRunner::new()
            .with_capture_output(GITVERSION_JSON)
            .with_hook(tool_outputs(fx.root())),
    );
    let sink = Arc::new(RecordingSink::new());
    let ctx = ContextBuilder::new(fx.root())
        .solution("Lib.sln")
        .coverage(CoverageMode::On)
        .version_command("dotnet-gitversion /output json")
        .build(runner.clone(), sink.clone());
    let mut exec = executor_for(&builtin_config(), ctx);

    let report = with_timeout(exec.run(&names(&["Pack"]))).await.unwrap();

    assert_eq!(report.executed(), vec!["Restore", "Compile", "Test", "Coverage", "Pack"]);
    assert!(report.status_of("Clean").is_none());

    let commands = runner.commands();
    assert_eq!(
        commands.iter().filter(|c| c.contains("gitversion")).count(),
        1,
        "version resolved once: {commands:?}"
    );
    let compile = commands.iter().find(|c| c.contains("-t:Rebuild")).unwrap();
    assert!(compile.contains("-p:AssemblyVersion=1.3.0.0"));
    assert!(compile.contains("-nodeReuse:true"));
    let pack = commands.iter().find(|c| c.starts_with("dotnet pack")).unwrap();
    assert!(pack.contains("-p:PackageVersion=1.3.0-alpha0007"));

    assert!(fx.path("artifacts/coverage-report.zip").is_file());
    let published = sink.published();
    assert!(published.contains(&Published::TestResults {
        title: "Lib.Tests (Debug)".to_string(),
        file: fx.path("artifacts/test-results/Lib.Tests.trx"),
    }));
    assert!(published.iter().any(|p| matches!(p, Published::Coverage { .. })));

    let test = report.targets.iter().find(|t| t.name == "Test").unwrap();
    assert_eq!(test.produced.len(), 2);
    let pack = report.targets.iter().find(|t| t.name == "Pack").unwrap();
    assert_eq!(pack.produced, vec![fx.path("artifacts/Lib.1.3.0-alpha0007.nupkg")]);
}

#[tokio::test]
async fn clean_runs_first_and_removes_outputs() {
    init_tracing();
    let fx = fixture();
    fs::create_dir_all(fx.path("src/Lib/bin/Debug")).unwrap();
    fs::create_dir_all(fx.path("tests/Lib.Tests/obj")).unwrap();
    fs::create_dir_all(fx.path("artifacts")).unwrap();
    fs::write(fx.path("artifacts/stale.nupkg"), "").unwrap();

    let runner = Arc::new(FakeRunner::new());
    let ctx = ContextBuilder::new(fx.root())
        .solution("Lib.sln")
        .build(runner.clone(), Arc::new(RecordingSink::new()));
    let mut exec = executor_for(&builtin_config(), ctx);

    let report = exec.run(&names(&["Restore", "Clean"])).await.unwrap();

    assert_eq!(report.executed(), vec!["Clean", "Restore"]);
    assert!(!fx.path("src/Lib/bin").exists());
    assert!(!fx.path("tests/Lib.Tests/obj").exists());
    assert!(fx.path("src/Lib/Lib.csproj").exists());
    assert!(fx.path("artifacts").is_dir());
    assert!(!fx.path("artifacts/stale.nupkg").exists());
}

#[tokio::test]
async fn coverage_is_skipped_without_data() {
    init_tracing();
    let fx = fixture();
    let runner = Arc::new(FakeRunner::new().with_hook(tool_outputs(fx.root())));
    let ctx = ContextBuilder::new(fx.root())
        .solution("Lib.sln")
        .coverage(CoverageMode::Off)
        .build(runner.clone(), Arc::new(RecordingSink::new()));
    let mut exec = executor_for(&builtin_config(), ctx);

    let report = exec.run(&names(&["Pack"])).await.unwrap();

    assert_eq!(report.status_of("Coverage"), Some(TargetStatus::Executed));
    assert!(!fx.path("artifacts/coverage-report.zip").exists());
    assert!(runner.commands().iter().all(|c| !c.starts_with("reportgenerator")));
}

#[tokio::test]
async fn version_failure_stops_the_run() {
    init_tracing();
    let fx = fixture();
    let runner = Arc::new(FakeRunner::new().failing_on("gitversion"));
    let ctx = ContextBuilder::new(fx.root())
        .solution("Lib.sln")
        .version_command("dotnet-gitversion /output json")
        .build(runner.clone(), Arc::new(RecordingSink::new()));
    let mut exec = executor_for(&builtin_config(), ctx);

    let err = exec.run(&names(&["Pack"])).await.unwrap_err();

    assert!(matches!(&err, BuilddagError::TargetFailed { target, .. } if target == "Compile"));
    let report = err.report().unwrap();
    assert_eq!(report.executed(), vec!["Restore"]);
    assert_eq!(report.with_status(TargetStatus::NotRun), vec!["Test", "Coverage", "Pack"]);
}

#[tokio::test]
async fn missing_solution_is_a_config_error() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(FakeRunner::new());
    let ctx = ContextBuilder::new(dir.path()).build(runner.clone(), Arc::new(RecordingSink::new()));
    let mut exec = executor_for(&builtin_config(), ctx);

    let err = exec.run(&names(&["Pack"])).await.unwrap_err();
    assert!(matches!(err, BuilddagError::ConfigError(ref m) if m.contains("missing required parameter")));
    assert!(runner.invocations().is_empty());

    // Clean needs no solution.
    exec.run(&names(&["Clean"])).await.unwrap();
}

#[tokio::test]
async fn configured_solution_that_does_not_exist_fails_before_restore() {
    init_tracing();
    let fx = fixture();
    let runner = Arc::new(FakeRunner::new());
    let ctx = ContextBuilder::new(fx.root())
        .solution("Missing.sln")
        .build(runner.clone(), Arc::new(RecordingSink::new()));
    let mut exec = executor_for(&builtin_config(), ctx);

    let err = exec.run(&names(&["Pack"])).await.unwrap_err();

    assert!(
        matches!(&err, BuilddagError::ConfigError(m) if m.contains("missing required parameter") && m.contains("Missing.sln")),
        "{err:?}"
    );
    assert!(runner.invocations().is_empty());
    assert_eq!(exec.record().len(), 0);
}
