// src/lib.rs

pub mod actions;
pub mod ci;
pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod patterns;
pub mod project;
pub mod types;
pub mod version;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::ci::sink_for;
use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_or_default};
use crate::config::model::ConfigFile;
use crate::config::settings::{BuildPaths, BuildSettings, SettingsOverrides};
use crate::config::validate::validate_package_version;
use crate::dag::{resolve_plan, ExecutionPlan, TargetGraph};
use crate::engine::{BuildContext, ExecutionReport, Executor, TargetName};
use crate::exec::ShellRunner;
use crate::version::{VersionResolver, VersionSource};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - pipeline loading (file or built-in)
/// - settings resolution from CLI overrides and the environment
/// - the build context (process runner, CI sink, version provider)
/// - the executor, and the summary printed after the run
pub async fn run(args: CliArgs) -> Result<()> {
    let (config_path, explicit) = config_location(&args);
    let cfg = load_or_default(&config_path, explicit)?;
    let graph = TargetGraph::from_config(&cfg)?;

    if args.list {
        print_targets(&graph, &cfg);
        return Ok(());
    }

    let requested = requested_targets(&args, &cfg);
    if args.plan {
        let plan = resolve_plan(&graph, &requested)?;
        print_plan(&plan);
        return Ok(());
    }

    if let Some(v) = &args.package_version {
        validate_package_version("--package-version", v)?;
    }

    let root = build_root(&args, &config_path)?;
    let overrides = SettingsOverrides {
        configuration: args.configuration,
        host: args.host,
        coverage: args.coverage,
        package_version: args.package_version.clone(),
    };
    let settings = BuildSettings::from_env(&cfg.build, &overrides);
    let paths = BuildPaths::resolve(&root, &cfg.paths, settings.configuration)?;

    info!(
        root = %paths.root.display(),
        configuration = %settings.configuration,
        host = %settings.host,
        coverage = settings.collect_coverage,
        "build settings resolved"
    );

    let version = VersionResolver::new(VersionSource::from_config(
        &cfg.version,
        overrides.package_version.as_deref(),
    ));
    let sink = sink_for(&settings);
    let ctx = BuildContext::new(
        settings,
        paths,
        cfg.tools.clone(),
        version,
        Arc::new(ShellRunner::new()),
        sink,
    );

    let mut executor = Executor::new(graph, ctx);
    match executor.run(&requested).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(err) => {
            if let Some(report) = err.report() {
                print_report(report);
            }
            Err(err.into())
        }
    }
}

/// Pipeline file to load, and whether it was named on the command line.
fn config_location(args: &CliArgs) -> (PathBuf, bool) {
    match &args.config {
        Some(path) => (PathBuf::from(path), true),
        None => (default_config_path(), false),
    }
}

/// Targets from the command line, or the pipeline's primary target.
fn requested_targets(args: &CliArgs, cfg: &ConfigFile) -> Vec<TargetName> {
    if args.targets.is_empty() {
        vec![cfg.build.primary.clone()]
    } else {
        args.targets.clone()
    }
}

/// `--root`, or the directory containing the pipeline file.
fn build_root(args: &CliArgs, config_path: &Path) -> Result<PathBuf> {
    let root = match &args.root {
        Some(root) => PathBuf::from(root),
        None => config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    Ok(std::path::absolute(root)?)
}

fn print_targets(graph: &TargetGraph, cfg: &ConfigFile) {
    println!("targets ({}):", graph.len());
    for target in graph.targets() {
        let marker = if target.name == cfg.build.primary { " (primary)" } else { "" };
        println!("  - {}{}", target.name, marker);
        if let Some(desc) = &target.description {
            println!("      {desc}");
        }
        println!("      action: {}", target.action);
        let relations = [
            ("depends_on", &target.depends_on),
            ("before", &target.before),
            ("after", &target.after),
            ("triggered_by", &target.triggered_by),
            ("produces", &target.produces),
        ];
        for (label, list) in relations {
            if !list.is_empty() {
                println!("      {label}: {}", list.join(", "));
            }
        }
    }
}

fn print_plan(plan: &ExecutionPlan) {
    println!("execution plan for {}:", plan.requested.join(", "));
    for (i, name) in plan.order.iter().enumerate() {
        let note = if plan.triggered.contains(name) { " (triggered)" } else { "" };
        println!("  {:>2}. {}{}", i + 1, name, note);
    }
    debug!("plan printed (no execution)");
}

fn print_report(report: &ExecutionReport) {
    let width = report
        .targets
        .iter()
        .map(|t| t.name.len())
        .max()
        .unwrap_or(0)
        .max("target".len());

    println!();
    println!("{:<width$}  {:<16}  {:>9}", "target", "status", "duration");
    for t in &report.targets {
        println!(
            "{:<width$}  {:<16}  {:>8.2}s",
            t.name,
            t.status.to_string(),
            t.duration.as_secs_f64()
        );
        for file in &t.produced {
            println!("{:<width$}    -> {}", "", file.display());
        }
    }
    println!(
        "{:<width$}  {:<16}  {:>8.2}s",
        "total",
        "",
        report.total_duration().as_secs_f64()
    );
}
