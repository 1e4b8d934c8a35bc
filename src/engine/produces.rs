// src/engine/produces.rs

//! Post-run check of a target's `produces` patterns.
//!
//! Declared outputs are reported, never enforced: a pattern matching nothing
//! is a warning, not a failure.

use std::path::{Path, PathBuf};
use std::slice;

use tracing::{debug, warn};

use crate::dag::TargetSpec;
use crate::patterns::find_matching_files;

/// Files under `root` matching the target's declared outputs.
pub fn check_produces(root: &Path, spec: &TargetSpec) -> Vec<PathBuf> {
    let mut produced = Vec::new();
    for pattern in &spec.produces {
        match find_matching_files(root, slice::from_ref(pattern)) {
            Ok(files) if files.is_empty() => {
                warn!(target_name = %spec.name, pattern = %pattern, "declared output not found");
            }
            Ok(files) => {
                debug!(target_name = %spec.name, pattern = %pattern, count = files.len(), "declared output found");
                produced.extend(files);
            }
            Err(e) => {
                warn!(target_name = %spec.name, pattern = %pattern, error = %e, "cannot check declared output");
            }
        }
    }
    produced.sort();
    produced.dedup();
    produced
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn reports_matching_outputs_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("artifacts")).unwrap();
        fs::write(dir.path().join("artifacts/Lib.1.0.0.nupkg"), "").unwrap();

        let mut spec = TargetSpec::new("Pack");
        spec.produces = vec!["artifacts/*.nupkg".to_string(), "artifacts/*.snupkg".to_string()];

        let produced = check_produces(dir.path(), &spec);
        assert_eq!(produced, vec![dir.path().join("artifacts/Lib.1.0.0.nupkg")]);
    }
}
