// tests/coverage_and_pack.rs

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

use builddag::actions::{coverage, pack};
use builddag::engine::{ActionEnv, BuildContext};
use builddag::patterns::files_with_extension;
use builddag::types::BuiltinAction;
use builddag_test_utils::builders::ContextBuilder;
use builddag_test_utils::fake_runner::{FakeRunner, Published, RecordingSink};
use builddag_test_utils::init_tracing;

struct Harness {
    dir: tempfile::TempDir,
    runner: Arc<FakeRunner>,
    sink: Arc<RecordingSink>,
    ctx: BuildContext,
}

fn harness(runner: FakeRunner) -> Harness {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(runner);
    let sink = Arc::new(RecordingSink::new());
    let ctx = ContextBuilder::new(dir.path())
        .solution("Lib.sln")
        .fixed_version("2.0.0-rc.1")
        .build(runner.clone(), sink.clone());
    Harness {
        dir,
        runner,
        sink,
        ctx,
    }
}

fn env<'a>(ctx: &'a BuildContext, target: &'a str, done: &'a HashSet<BuiltinAction>) -> ActionEnv<'a> {
    ActionEnv {
        ctx,
        target,
        completed_actions: done,
    }
}

#[tokio::test]
async fn coverage_without_data_succeeds_without_archive() {
    let h = harness(FakeRunner::new());
    let done = HashSet::new();

    coverage::run(&env(&h.ctx, "Coverage", &done)).await.unwrap();

    assert!(!h.ctx.paths.coverage_archive.exists());
    assert!(h.runner.invocations().is_empty());
    assert!(h.sink.published().is_empty());
}

#[tokio::test]
async fn coverage_with_data_produces_one_archive() {
    let h = harness(FakeRunner::new());
    let results = &h.ctx.paths.test_results;
    fs::create_dir_all(results).unwrap();
    fs::write(results.join("Lib.Tests.xml"), "<coverage/>").unwrap();
    fs::write(results.join("Lib.Tests.trx"), "<TestRun/>").unwrap();
    fs::create_dir_all(&h.ctx.paths.coverage_report).unwrap();
    fs::write(h.ctx.paths.coverage_report.join("index.html"), "<html/>").unwrap();

    let done = HashSet::new();
    coverage::run(&env(&h.ctx, "Coverage", &done)).await.unwrap();

    let archives = files_with_extension(h.ctx.paths.coverage_archive.parent().unwrap(), "zip").unwrap();
    assert_eq!(archives, vec![h.ctx.paths.coverage_archive.clone()]);

    let commands = h.runner.commands();
    assert_eq!(commands.len(), 1);
    let xml = results.join("Lib.Tests.xml");
    assert!(commands[0].contains(&format!("-reports:{}", xml.display())), "{}", commands[0]);

    assert_eq!(
        h.sink.published(),
        vec![Published::Coverage {
            summary_file: xml,
            report_dir: h.ctx.paths.coverage_report.clone(),
        }]
    );
}

#[tokio::test]
async fn coverage_merges_every_data_file() {
    let h = harness(FakeRunner::new());
    let results = &h.ctx.paths.test_results;
    fs::create_dir_all(results).unwrap();
    fs::write(results.join("A.Tests.xml"), "").unwrap();
    fs::write(results.join("B.Tests.xml"), "").unwrap();

    let done = HashSet::new();
    coverage::run(&env(&h.ctx, "Coverage", &done)).await.unwrap();

    let expected = format!(
        "{};{}",
        results.join("A.Tests.xml").display(),
        results.join("B.Tests.xml").display()
    );
    assert!(h.runner.commands()[0].contains(&expected));
    assert_eq!(h.sink.published().len(), 2);
    assert!(h.ctx.paths.coverage_archive.is_file());
}

#[tokio::test]
async fn coverage_tool_failure_is_an_error() {
    let h = harness(FakeRunner::new().failing_on("reportgenerator"));
    let results = &h.ctx.paths.test_results;
    fs::create_dir_all(results).unwrap();
    fs::write(results.join("Lib.Tests.xml"), "").unwrap();

    let done = HashSet::new();
    let err = coverage::run(&env(&h.ctx, "Coverage", &done)).await.unwrap_err();
    assert!(err.to_string().contains("reportgenerator"));
    assert!(!h.ctx.paths.coverage_archive.exists());
}

#[tokio::test]
async fn pack_uses_descriptors_or_project_with_same_version() {
    // Project path.
    let h = harness(FakeRunner::new());
    let done = HashSet::new();
    pack::run(&env(&h.ctx, "Pack", &done)).await.unwrap();
    let project_cmds = h.runner.commands();
    assert_eq!(project_cmds.len(), 1);
    assert!(project_cmds[0].starts_with("dotnet pack"));
    assert!(project_cmds[0].contains("2.0.0-rc.1"));
    assert!(h.ctx.paths.artifacts.is_dir());

    // Descriptor path.
    let h = harness(FakeRunner::new());
    fs::create_dir_all(&h.ctx.paths.descriptors).unwrap();
    fs::write(h.ctx.paths.descriptors.join("Lib.nuspec"), "<package/>").unwrap();
    fs::write(h.ctx.paths.descriptors.join("readme.md"), "").unwrap();
    pack::run(&env(&h.ctx, "Pack", &done)).await.unwrap();
    let descriptor_cmds = h.runner.commands();
    assert_eq!(descriptor_cmds.len(), 1);
    assert!(descriptor_cmds[0].starts_with("nuget pack"));
    assert!(descriptor_cmds[0].contains("Lib.nuspec"));
    assert!(descriptor_cmds[0].contains("-Version 2.0.0-rc.1"));
}

#[tokio::test]
async fn descriptor_pack_builds_only_without_prior_compile() {
    let h = harness(FakeRunner::new());
    fs::create_dir_all(&h.ctx.paths.descriptors).unwrap();
    fs::write(h.ctx.paths.descriptors.join("Lib.nuspec"), "<package/>").unwrap();

    let none = HashSet::new();
    pack::run(&env(&h.ctx, "Pack", &none)).await.unwrap();

    let compiled: HashSet<BuiltinAction> = [BuiltinAction::Compile].into_iter().collect();
    pack::run(&env(&h.ctx, "Pack", &compiled)).await.unwrap();

    let commands = h.runner.commands();
    assert!(commands[0].ends_with(" -Build"), "{}", commands[0]);
    assert!(!commands[1].contains("-Build"), "{}", commands[1]);
    assert!(h.dir.path().join("Nuspec").is_dir());
}
