// src/dag/record.rs

use std::collections::HashSet;

use crate::engine::TargetName;

/// Targets already executed in this process.
///
/// Append-only; guarantees each target runs at most once per process.
#[derive(Debug, Clone, Default)]
pub struct ExecutionRecord {
    seen: HashSet<TargetName>,
}

impl ExecutionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    /// Record a successful execution. Returns `false` if it was already there.
    pub fn mark_executed(&mut self, name: &str) -> bool {
        self.seen.insert(name.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}
