// src/engine/executor.rs

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::actions;
use crate::dag::{resolve_plan, ExecutionPlan, ExecutionRecord, TargetAction, TargetGraph};
use crate::engine::context::{ActionEnv, BuildContext};
use crate::engine::produces::check_produces;
use crate::engine::{ExecutionReport, TargetName, TargetStatus, TargetSummary};
use crate::errors::{BuilddagError, Result};
use crate::types::BuiltinAction;

/// Sequential target executor.
///
/// Responsibilities:
/// - Resolve a plan for each request (cycles and unknown targets fail here,
///   before any action runs).
/// - Check that every planned built-in action has what it needs.
/// - Run targets one at a time in plan order, each at most once per
///   executor, and stop at the first failure.
pub struct Executor {
    graph: TargetGraph,
    ctx: BuildContext,
    record: ExecutionRecord,
    /// Built-in actions that completed successfully; Pack asks whether
    /// Compile already ran.
    completed_actions: HashSet<BuiltinAction>,
}

impl Executor {
    pub fn new(graph: TargetGraph, ctx: BuildContext) -> Self {
        Self {
            graph,
            ctx,
            record: ExecutionRecord::new(),
            completed_actions: HashSet::new(),
        }
    }

    pub fn graph(&self) -> &TargetGraph {
        &self.graph
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    pub fn record(&self) -> &ExecutionRecord {
        &self.record
    }

    pub fn plan(&self, requested: &[TargetName]) -> Result<ExecutionPlan> {
        resolve_plan(&self.graph, requested)
    }

    /// Fail early when a planned action needs the solution descriptor and
    /// none was found, or the configured one does not exist.
    fn preflight(&self, plan: &ExecutionPlan) -> Result<()> {
        let problem = match &self.ctx.paths.solution {
            Some(path) if path.is_file() => return Ok(()),
            Some(path) => format!("solution descriptor {} does not exist", path.display()),
            None => format!(
                "no solution descriptor was configured or found in {}",
                self.ctx.paths.root.display()
            ),
        };
        for name in plan.order.iter().filter(|n| !self.record.contains(n)) {
            if let Some(TargetAction::Builtin(action)) = self.graph.get(name).map(|t| &t.action) {
                if action.needs_solution() {
                    return Err(BuilddagError::ConfigError(format!(
                        "missing required parameter: target '{name}' runs the `{action}` action but {problem}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Execute `requested` and everything it needs.
    ///
    /// Targets that already ran on this executor are reported as
    /// [`TargetStatus::AlreadyExecuted`] and not run again. On the first
    /// failing action the remaining targets are reported as
    /// [`TargetStatus::NotRun`] and [`BuilddagError::TargetFailed`] is
    /// returned with the partial report.
    pub async fn run(&mut self, requested: &[TargetName]) -> Result<ExecutionReport> {
        let plan = self.plan(requested)?;
        self.preflight(&plan)?;

        info!(
            requested = ?plan.requested,
            order = ?plan.order,
            triggered = ?plan.triggered,
            "execution plan resolved"
        );

        let mut report = ExecutionReport::default();
        let mut failure: Option<(TargetName, anyhow::Error)> = None;

        for name in &plan.order {
            if failure.is_some() {
                report.targets.push(summary(name, TargetStatus::NotRun, Duration::ZERO));
                continue;
            }
            if self.record.contains(name) {
                debug!(target_name = %name, "already executed in this process; skipping");
                report
                    .targets
                    .push(summary(name, TargetStatus::AlreadyExecuted, Duration::ZERO));
                continue;
            }

            let spec = self
                .graph
                .get(name)
                .ok_or_else(|| BuilddagError::TargetNotFound(name.clone()))?;

            info!(target_name = %name, action = %spec.action, "starting target");
            let started = Instant::now();
            let env = ActionEnv {
                ctx: &self.ctx,
                target: name,
                completed_actions: &self.completed_actions,
            };
            let outcome = actions::execute(&spec.action, &env).await;
            let duration = started.elapsed();

            match outcome {
                Ok(()) => {
                    self.record.mark_executed(name);
                    if let TargetAction::Builtin(action) = &spec.action {
                        self.completed_actions.insert(*action);
                    }
                    let produced = check_produces(&self.ctx.paths.root, spec);
                    info!(
                        target_name = %name,
                        elapsed_ms = duration.as_millis() as u64,
                        "target succeeded"
                    );
                    report.targets.push(TargetSummary {
                        name: name.clone(),
                        status: TargetStatus::Executed,
                        duration,
                        produced,
                    });
                }
                Err(e) => {
                    error!(
                        target_name = %name,
                        elapsed_ms = duration.as_millis() as u64,
                        error = %format!("{e:#}"),
                        "target failed"
                    );
                    report.targets.push(summary(name, TargetStatus::Failed, duration));
                    failure = Some((name.clone(), e));
                }
            }
        }

        match failure {
            None => {
                info!(
                    executed = report.executed().len(),
                    elapsed_ms = report.total_duration().as_millis() as u64,
                    "run finished"
                );
                Ok(report)
            }
            Some((target, source)) => Err(BuilddagError::TargetFailed {
                target,
                report: Box::new(report),
                source: source.into(),
            }),
        }
    }
}

fn summary(name: &str, status: TargetStatus, duration: Duration) -> TargetSummary {
    TargetSummary {
        name: name.to_string(),
        status,
        duration,
        produced: Vec::new(),
    }
}
