#![allow(dead_code)]

use builddag::config::ConfigFile;
use builddag::dag::TargetGraph;
use builddag::engine::{BuildContext, Executor, TargetName};

pub fn executor_for(cfg: &ConfigFile, ctx: BuildContext) -> Executor {
    let graph = TargetGraph::from_config(cfg).expect("graph from valid config");
    Executor::new(graph, ctx)
}

pub fn names(list: &[&str]) -> Vec<TargetName> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Position of `needle` in `haystack`, panicking with context if absent.
pub fn pos(haystack: &[String], needle: &str) -> usize {
    haystack
        .iter()
        .position(|s| s == needle)
        .unwrap_or_else(|| panic!("{needle} not in {haystack:?}"))
}
