// src/patterns.rs

//! Glob and directory-listing helpers shared by the clean action and the
//! `produces` check.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

/// Build a GlobSet from simple string patterns.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Files directly inside `dir` with extension `ext`, sorted by name.
///
/// A missing directory has no files.
pub fn files_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext)) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Leading components of `pattern` that contain no glob metacharacters.
///
/// `artifacts/*.nupkg` -> `artifacts`; `**/bin` -> ``.
fn literal_prefix(pattern: &str) -> PathBuf {
    pattern
        .split('/')
        .take_while(|c| !c.contains(['*', '?', '[', '{']))
        .collect()
}

/// Files under `root` matching any of `patterns` (relative to `root`).
///
/// `*` stays within one path component; use `**` to cross directories.
/// Only the literal prefix of each pattern is walked, so `artifacts/*.zip`
/// does not scan the whole tree.
pub fn find_matching_files(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut found = BTreeSet::new();
    for pattern in patterns {
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pattern}"))?
            .compile_matcher();
        let base = root.join(literal_prefix(pattern));
        if !base.exists() {
            continue;
        }
        for entry in WalkDir::new(&base).follow_links(false) {
            let entry = entry.with_context(|| format!("walking {}", base.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if matcher.is_match(rel) {
                found.insert(entry.path().to_path_buf());
            }
        }
    }
    Ok(found.into_iter().collect())
}

/// Directories under `base` whose path relative to `base` matches `set`.
///
/// Matching directories are not descended into.
pub fn find_matching_dirs(base: &Path, set: &GlobSet) -> Result<Vec<PathBuf>> {
    if !base.is_dir() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    let mut walker = WalkDir::new(base).min_depth(1).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.with_context(|| format!("walking {}", base.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let rel = entry.path().strip_prefix(base).unwrap_or(entry.path());
        if set.is_match(rel) {
            found.push(entry.path().to_path_buf());
            walker.skip_current_dir();
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_prefix_stops_at_first_glob() {
        assert_eq!(literal_prefix("artifacts/*.nupkg"), PathBuf::from("artifacts"));
        assert_eq!(literal_prefix("a/b/**/c"), PathBuf::from("a/b"));
        assert_eq!(literal_prefix("**/bin"), PathBuf::new());
    }

    #[test]
    fn lists_files_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.xml"), "").unwrap();
        fs::write(dir.path().join("a.xml"), "").unwrap();
        fs::write(dir.path().join("a.trx"), "").unwrap();
        fs::create_dir(dir.path().join("nested.xml")).unwrap();

        let files = files_with_extension(dir.path(), "xml").unwrap();
        assert_eq!(files, vec![dir.path().join("a.xml"), dir.path().join("b.xml")]);
        assert!(files_with_extension(&dir.path().join("missing"), "xml").unwrap().is_empty());
    }

    #[test]
    fn finds_files_matching_patterns() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("artifacts/test-results")).unwrap();
        fs::write(dir.path().join("artifacts/Lib.1.0.0.nupkg"), "").unwrap();
        fs::write(dir.path().join("artifacts/test-results/Lib.Tests.trx"), "").unwrap();

        let found = find_matching_files(
            dir.path(),
            &["artifacts/*.nupkg".to_string(), "artifacts/none/*.zip".to_string()],
        )
        .unwrap();
        assert_eq!(found, vec![dir.path().join("artifacts/Lib.1.0.0.nupkg")]);
    }

    #[test]
    fn star_does_not_cross_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("artifacts/test-results")).unwrap();
        fs::write(dir.path().join("artifacts/test-results/stray.nupkg"), "").unwrap();

        let patterns = ["artifacts/*.nupkg".to_string()];
        assert!(find_matching_files(dir.path(), &patterns).unwrap().is_empty());

        let found = find_matching_files(dir.path(), &["artifacts/**/*.nupkg".to_string()]).unwrap();
        assert_eq!(found, vec![dir.path().join("artifacts/test-results/stray.nupkg")]);
    }

    #[test]
    fn finds_dirs_without_descending() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Lib/bin/Debug/bin")).unwrap();
        fs::create_dir_all(dir.path().join("Lib/obj")).unwrap();
        fs::create_dir_all(dir.path().join("Lib/binary")).unwrap();

        let set = build_globset(&["**/bin".to_string(), "**/obj".to_string()]).unwrap();
        let found = find_matching_dirs(dir.path(), &set).unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("Lib/bin"), dir.path().join("Lib/obj")]
        );
    }
}
