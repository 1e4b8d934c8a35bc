// src/project/solution.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, warn};

// Project("{FAE04EC0-...}") = "MyLib.Tests", "tests\MyLib.Tests\MyLib.Tests.csproj", "{...}"
static PROJECT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^Project\("\{[^}]*\}"\)\s*=\s*"([^"]+)",\s*"([^"]+)""#)
        .expect("valid regex")
});

static TARGET_FRAMEWORKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<TargetFrameworks?>\s*([^<]+?)\s*</TargetFrameworks?>").expect("valid regex")
});

/// Solution folders show up as `Project(...)` entries too; skip anything
/// that isn't a project file.
const PROJECT_EXTENSIONS: &[&str] = &["csproj", "fsproj", "vbproj"];

/// A buildable project listed in the solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    /// Target frameworks declared by the project file (may be empty).
    pub frameworks: Vec<String>,
}

/// Parsed solution descriptor.
#[derive(Debug, Clone)]
pub struct Solution {
    pub path: PathBuf,
    pub projects: Vec<Project>,
}

impl Solution {
    /// Read a solution file and the project files it references.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading solution {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::parse(path, base, &contents))
    }

    /// Parse solution text; project paths are resolved against `base`.
    pub fn parse(path: &Path, base: &Path, contents: &str) -> Self {
        let projects = PROJECT_LINE
            .captures_iter(contents)
            .filter_map(|caps| {
                let name = caps[1].to_string();
                // Solution files use Windows separators.
                let rel = caps[2].replace('\\', "/");
                let project_path = base.join(rel);
                let is_project = project_path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| PROJECT_EXTENSIONS.contains(&e));
                if !is_project {
                    debug!(entry = %name, "skipping non-project solution entry");
                    return None;
                }
                let frameworks = read_frameworks(&project_path);
                Some(Project {
                    name,
                    path: project_path,
                    frameworks,
                })
            })
            .collect();

        Self {
            path: path.to_path_buf(),
            projects,
        }
    }

    /// Projects whose name ends with `suffix`.
    pub fn projects_with_suffix<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a Project> {
        self.projects.iter().filter(move |p| p.name.ends_with(suffix))
    }
}

/// Target frameworks from `<TargetFramework>` / `<TargetFrameworks>`.
///
/// Unreadable project files yield no frameworks.
fn read_frameworks(project_path: &Path) -> Vec<String> {
    match fs::read_to_string(project_path) {
        Ok(contents) => parse_frameworks(&contents),
        Err(e) => {
            warn!(project = %project_path.display(), error = %e, "cannot read project file");
            Vec::new()
        }
    }
}

pub(crate) fn parse_frameworks(project_xml: &str) -> Vec<String> {
    let mut frameworks = Vec::new();
    for caps in TARGET_FRAMEWORKS.captures_iter(project_xml) {
        for fw in caps[1].split(';') {
            let fw = fw.trim();
            if !fw.is_empty() && !frameworks.iter().any(|f| f == fw) {
                frameworks.push(fw.to_string());
            }
        }
    }
    frameworks
}

/// First `*.sln` file (by name) directly inside `root`, if any.
pub fn find_solution(root: &Path) -> std::io::Result<Option<PathBuf>> {
    if !root.is_dir() {
        return Ok(None);
    }
    let mut candidates: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "sln"))
        .collect();
    candidates.sort();
    Ok(candidates.into_iter().next())
}
