// src/dag/planner.rs

//! Execution planning.
//!
//! Given the requested targets, the planner:
//! 1. includes the `depends_on` closure of the request,
//! 2. repeatedly adds targets triggered by anything already included (plus
//!    their own dependencies),
//! 3. orders the result with a depth-first post-order walk over every
//!    predecessor relation (`depends_on`, `after`, `before`, `triggered_by`),
//!    failing on the first node revisited while still in progress,
//! 4. pulls triggered targets forward so they run right after their trigger
//!    once their other predecessors are done.
//!
//! Nothing runs until a plan exists, so a cyclic graph never causes side
//! effects.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::dag::graph::TargetGraph;
use crate::engine::TargetName;
use crate::errors::{BuilddagError, Result};

/// Ordered list of targets to execute for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Targets named by the invoker.
    pub requested: Vec<TargetName>,
    /// Every target to run, in execution order.
    pub order: Vec<TargetName>,
    /// Targets included only because something in the run triggered them.
    pub triggered: Vec<TargetName>,
}

impl ExecutionPlan {
    pub fn contains(&self, name: &str) -> bool {
        self.order.iter().any(|t| t == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Resolve the execution plan for `requested`.
pub fn resolve_plan(graph: &TargetGraph, requested: &[TargetName]) -> Result<ExecutionPlan> {
    for name in requested {
        if !graph.contains(name) {
            return Err(BuilddagError::TargetNotFound(name.clone()));
        }
    }

    let (included, triggered) = collect_targets(graph, requested);
    let preds = predecessors(graph, &included);

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut base: Vec<&str> = Vec::with_capacity(included.len());
    let mut path: Vec<&str> = Vec::new();

    let roots = requested
        .iter()
        .map(|s| s.as_str())
        .chain(triggered.iter().copied());
    for root in roots {
        visit(root, &preds, &mut marks, &mut path, &mut base)?;
    }

    let order = pull_triggered_forward(graph, &included, &preds, &base);
    debug!(?order, ?triggered, "execution plan resolved");

    Ok(ExecutionPlan {
        requested: requested.to_vec(),
        order,
        triggered: triggered.into_iter().map(str::to_string).collect(),
    })
}

/// The set of targets in the run, plus the ones added through triggers (in
/// the order they were added).
fn collect_targets<'g>(
    graph: &'g TargetGraph,
    requested: &[TargetName],
) -> (HashSet<&'g str>, Vec<&'g str>) {
    let mut included: HashSet<&str> = HashSet::new();
    for name in requested {
        include_with_dependencies(graph, name, &mut included);
    }

    let mut triggered: Vec<&str> = Vec::new();
    loop {
        let newly: Vec<&str> = graph
            .targets()
            .filter(|t| !included.contains(t.name.as_str()))
            .filter(|t| t.triggered_by.iter().any(|src| included.contains(src.as_str())))
            .map(|t| t.name.as_str())
            .collect();

        if newly.is_empty() {
            break;
        }
        for name in newly {
            debug!(target_name = name, "included by trigger");
            triggered.push(name);
            include_with_dependencies(graph, name, &mut included);
        }
    }

    (included, triggered)
}

fn include_with_dependencies<'g>(graph: &'g TargetGraph, root: &str, included: &mut HashSet<&'g str>) {
    let mut stack: Vec<&str> = match graph.get(root) {
        Some(t) => vec![t.name.as_str()],
        None => return,
    };

    while let Some(name) = stack.pop() {
        if !included.insert(name) {
            continue;
        }
        for dep in graph.dependencies_of(name) {
            stack.push(dep.as_str());
        }
    }
}

/// Predecessors of each included target, restricted to the run.
fn predecessors<'g>(
    graph: &'g TargetGraph,
    included: &HashSet<&'g str>,
) -> HashMap<&'g str, Vec<&'g str>> {
    let mut preds: HashMap<&str, Vec<&str>> = HashMap::new();

    for t in graph.targets().filter(|t| included.contains(t.name.as_str())) {
        let mut list: Vec<&str> = Vec::new();
        let ordering = t
            .depends_on
            .iter()
            .chain(&t.after)
            .chain(&t.triggered_by)
            .map(|s| s.as_str())
            .chain(graph.declared_before(&t.name));

        for p in ordering {
            if included.contains(p) && !list.contains(&p) {
                list.push(p);
            }
        }
        preds.insert(t.name.as_str(), list);
    }

    preds
}

fn visit<'g>(
    node: &'g str,
    preds: &HashMap<&'g str, Vec<&'g str>>,
    marks: &mut HashMap<&'g str, Mark>,
    path: &mut Vec<&'g str>,
    out: &mut Vec<&'g str>,
) -> Result<()> {
    match marks.get(node) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            let start = path.iter().position(|n| *n == node).unwrap_or(0);
            let mut cycle: Vec<&str> = path[start..].to_vec();
            cycle.push(node);
            return Err(BuilddagError::DagCycle(cycle.join(" -> ")));
        }
        None => {}
    }

    marks.insert(node, Mark::InProgress);
    path.push(node);

    if let Some(list) = preds.get(node) {
        for &p in list {
            visit(p, preds, marks, path, out)?;
        }
    }

    path.pop();
    marks.insert(node, Mark::Done);
    out.push(node);
    Ok(())
}

/// Reorder a topological order so that triggered targets run as soon as
/// their trigger (and their other predecessors) have run.
fn pull_triggered_forward(
    graph: &TargetGraph,
    included: &HashSet<&str>,
    preds: &HashMap<&str, Vec<&str>>,
    base: &[&str],
) -> Vec<TargetName> {
    let mut order: Vec<TargetName> = Vec::with_capacity(base.len());
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut awaiting: Vec<&str> = Vec::new();
    let mut cursor = 0;

    let ready = |name: &str, emitted: &HashSet<&str>| {
        preds
            .get(name)
            .is_none_or(|list| list.iter().all(|p| emitted.contains(p)))
    };

    loop {
        let next = match awaiting.iter().position(|t| ready(*t, &emitted)) {
            Some(pos) => awaiting.remove(pos),
            None => {
                while cursor < base.len() && emitted.contains(base[cursor]) {
                    cursor += 1;
                }
                match base.get(cursor) {
                    Some(name) => *name,
                    None => break,
                }
            }
        };

        emitted.insert(next);
        awaiting.retain(|t| *t != next);
        order.push(next.to_string());

        for t in graph.triggered_by(next) {
            if included.contains(t) && !emitted.contains(t) && !awaiting.contains(&t) {
                awaiting.push(t);
            }
        }
    }

    order
}
