use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary build root holding a solution file and its projects.
pub struct SolutionFixture {
    dir: TempDir,
    projects: Vec<(String, Vec<String>)>,
}

impl SolutionFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
            projects: Vec::new(),
        }
    }

    /// Add a project; `frameworks` may be empty.
    pub fn project(mut self, name: &str, frameworks: &[&str]) -> Self {
        self.projects.push((
            name.to_string(),
            frameworks.iter().map(|f| f.to_string()).collect(),
        ));
        self
    }

    /// Write `Lib.sln` and one project file per project under `src/` (or
    /// `tests/` for names ending in `.Tests`).
    pub fn write(self) -> Self {
        let mut sln = String::from("Microsoft Visual Studio Solution File, Format Version 12.00\n");
        for (name, frameworks) in &self.projects {
            let folder = if name.ends_with(".Tests") { "tests" } else { "src" };
            let rel = format!("{folder}\\{name}\\{name}.csproj");
            sln.push_str(&format!(
                "Project(\"{{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}}\") = \"{name}\", \"{rel}\", \"{{00000000-0000-0000-0000-000000000000}}\"\nEndProject\n"
            ));

            let project_dir = self.root().join(folder).join(name);
            fs::create_dir_all(&project_dir).expect("Failed to create project dir");
            let tf = match frameworks.len() {
                0 => String::new(),
                1 => format!("<TargetFramework>{}</TargetFramework>", frameworks[0]),
                _ => format!("<TargetFrameworks>{}</TargetFrameworks>", frameworks.join(";")),
            };
            fs::write(
                project_dir.join(format!("{name}.csproj")),
                format!("<Project Sdk=\"Microsoft.NET.Sdk\"><PropertyGroup>{tf}</PropertyGroup></Project>"),
            )
            .expect("Failed to write project file");
        }
        fs::write(self.root().join("Lib.sln"), sln).expect("Failed to write solution");
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }
}

impl Default for SolutionFixture {
    fn default() -> Self {
        Self::new()
    }
}
