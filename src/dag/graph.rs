// src/dag/graph.rs

use std::collections::HashMap;
use std::fmt;

use crate::config::model::{ConfigFile, TargetConfig};
use crate::engine::TargetName;
use crate::errors::{BuilddagError, Result};
use crate::types::BuiltinAction;

/// What a target does when it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetAction {
    /// Aggregate target: only pulls in its dependencies.
    None,
    Builtin(BuiltinAction),
    /// Shell command run in the build root.
    Command(String),
}

impl fmt::Display for TargetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetAction::None => f.write_str("-"),
            TargetAction::Builtin(a) => write!(f, "{a}"),
            TargetAction::Command(cmd) => write!(f, "cmd: {cmd}"),
        }
    }
}

/// One declared target: a plain record built once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub name: TargetName,
    pub description: Option<String>,
    pub depends_on: Vec<TargetName>,
    pub before: Vec<TargetName>,
    pub after: Vec<TargetName>,
    pub triggered_by: Vec<TargetName>,
    pub produces: Vec<String>,
    pub action: TargetAction,
}

impl TargetSpec {
    /// A target with no relations and no action.
    pub fn new(name: impl Into<TargetName>) -> Self {
        Self {
            name: name.into(),
            description: None,
            depends_on: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
            triggered_by: Vec::new(),
            produces: Vec::new(),
            action: TargetAction::None,
        }
    }

    pub fn from_config(name: &str, cfg: &TargetConfig) -> Self {
        let action = match (&cfg.action, &cfg.cmd) {
            (Some(builtin), _) => TargetAction::Builtin(*builtin),
            (None, Some(cmd)) => TargetAction::Command(cmd.clone()),
            (None, None) => TargetAction::None,
        };
        Self {
            name: name.to_string(),
            description: cfg.description.clone(),
            depends_on: cfg.depends_on.clone(),
            before: cfg.before.clone(),
            after: cfg.after.clone(),
            triggered_by: cfg.triggered_by.clone(),
            produces: cfg.produces.clone(),
            action,
        }
    }
}

/// Declared targets indexed by name, in declaration order.
///
/// Construction checks names and references but not acyclicity; cycles are
/// reported by the planner (and by config validation for pipeline files).
#[derive(Debug, Clone)]
pub struct TargetGraph {
    targets: Vec<TargetSpec>,
    index: HashMap<TargetName, usize>,
}

impl TargetGraph {
    pub fn from_targets(targets: Vec<TargetSpec>) -> Result<Self> {
        let mut index = HashMap::with_capacity(targets.len());
        for (i, t) in targets.iter().enumerate() {
            if index.insert(t.name.clone(), i).is_some() {
                return Err(BuilddagError::ConfigError(format!(
                    "target '{}' is declared more than once",
                    t.name
                )));
            }
        }

        for t in targets.iter() {
            let referenced = t
                .depends_on
                .iter()
                .chain(&t.before)
                .chain(&t.after)
                .chain(&t.triggered_by);
            for other in referenced {
                if !index.contains_key(other) {
                    return Err(BuilddagError::ConfigError(format!(
                        "target '{}' references unknown target '{}'",
                        t.name, other
                    )));
                }
            }
        }

        Ok(Self { targets, index })
    }

    /// Build the graph from a validated [`ConfigFile`].
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let targets = cfg
            .target
            .iter()
            .map(|(name, tc)| TargetSpec::from_config(name, tc))
            .collect();
        Self::from_targets(targets)
    }

    pub fn get(&self, name: &str) -> Option<&TargetSpec> {
        self.index.get(name).map(|&i| &self.targets[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All targets in declaration order.
    pub fn targets(&self) -> impl Iterator<Item = &TargetSpec> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Declared predecessors of a target (its `depends_on`).
    pub fn dependencies_of(&self, name: &str) -> &[TargetName] {
        self.get(name).map(|t| t.depends_on.as_slice()).unwrap_or(&[])
    }

    /// Targets that list `name` in their `triggered_by`.
    pub fn triggered_by(&self, name: &str) -> Vec<&str> {
        self.targets
            .iter()
            .filter(|t| t.triggered_by.iter().any(|d| d == name))
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Targets that list `name` in their `before`.
    pub fn declared_before(&self, name: &str) -> Vec<&str> {
        self.targets
            .iter()
            .filter(|t| t.before.iter().any(|d| d == name))
            .map(|t| t.name.as_str())
            .collect()
    }
}
