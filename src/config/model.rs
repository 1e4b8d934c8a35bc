// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::{BuildHost, BuiltinAction, Configuration, CoverageMode};

/// Top-level pipeline file as read from TOML, before validation.
///
/// ```toml
/// [build]
/// primary = "Pack"
///
/// [paths]
/// solution = "MyLib.sln"
///
/// [tools]
/// restore = "dotnet restore \"{solution}\""
///
/// [target.Compile]
/// action = "compile"
/// depends_on = ["Restore"]
/// ```
///
/// All sections are optional. A file without any `[target.<name>]` section
/// gets the built-in Clean/Restore/Compile/Test/Coverage/Pack targets.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub tools: ToolsSection,

    #[serde(default)]
    pub version: VersionSection,

    /// All targets from `[target.<name>]`, keyed by target name.
    #[serde(default)]
    pub target: BTreeMap<String, TargetConfig>,
}

/// Validated pipeline configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// holders can rely on: known references only, no cycles, valid templates.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub build: BuildSection,
    pub paths: PathsSection,
    pub tools: ToolsSection,
    pub version: VersionSection,
    pub target: BTreeMap<String, TargetConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            build: raw.build,
            paths: raw.paths,
            tools: raw.tools,
            version: raw.version,
            target: raw.target,
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Target run when none is given on the command line.
    #[serde(default = "default_primary")]
    pub primary: String,

    /// Fixed configuration; if `None`, derived from the build host.
    #[serde(default)]
    pub configuration: Option<Configuration>,

    /// Fixed build host; if `None`, detected from the environment.
    #[serde(default)]
    pub host: Option<BuildHost>,

    #[serde(default)]
    pub coverage: CoverageMode,

    /// Projects whose name ends with this suffix are test projects.
    #[serde(default = "default_test_project_suffix")]
    pub test_project_suffix: String,

    /// Directory globs removed by the `clean` action under the source and
    /// tests directories.
    #[serde(default = "default_clean_globs")]
    pub clean_globs: Vec<String>,
}

fn default_primary() -> String {
    "Pack".to_string()
}

fn default_test_project_suffix() -> String {
    ".Tests".to_string()
}

fn default_clean_globs() -> Vec<String> {
    vec!["**/bin".to_string(), "**/obj".to_string()]
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            configuration: None,
            host: None,
            coverage: CoverageMode::default(),
            test_project_suffix: default_test_project_suffix(),
            clean_globs: default_clean_globs(),
        }
    }
}

/// `[paths]` section. Every path is relative to the build root.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Solution descriptor; if `None`, the first `*.sln` in the root.
    #[serde(default)]
    pub solution: Option<String>,

    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default = "default_tests")]
    pub tests: String,

    #[serde(default = "default_artifacts")]
    pub artifacts: String,

    #[serde(default = "default_test_results")]
    pub test_results: String,

    #[serde(default = "default_coverage_report")]
    pub coverage_report: String,

    #[serde(default = "default_coverage_archive")]
    pub coverage_archive: String,

    /// May contain `{configuration}`.
    #[serde(default = "default_test_output")]
    pub test_output: String,

    /// Directory holding legacy package descriptors (`*.nuspec`).
    #[serde(default = "default_descriptors")]
    pub descriptors: String,
}

fn default_source() -> String {
    "src".to_string()
}

fn default_tests() -> String {
    "tests".to_string()
}

fn default_artifacts() -> String {
    "artifacts".to_string()
}

fn default_test_results() -> String {
    "artifacts/test-results".to_string()
}

fn default_coverage_report() -> String {
    "artifacts/coverage-report".to_string()
}

fn default_coverage_archive() -> String {
    "artifacts/coverage-report.zip".to_string()
}

fn default_test_output() -> String {
    "build/{configuration}/x64".to_string()
}

fn default_descriptors() -> String {
    "Nuspec".to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            solution: None,
            source: default_source(),
            tests: default_tests(),
            artifacts: default_artifacts(),
            test_results: default_test_results(),
            coverage_report: default_coverage_report(),
            coverage_archive: default_coverage_archive(),
            test_output: default_test_output(),
            descriptors: default_descriptors(),
        }
    }
}

/// `[tools]` section: command templates for the external tools.
///
/// Placeholders (`{name}`) are replaced verbatim; quote them in the template
/// where the value may contain spaces or shell metacharacters.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    #[serde(default = "default_restore")]
    pub restore: String,

    #[serde(default = "default_compile")]
    pub compile: String,

    #[serde(default = "default_test")]
    pub test: String,

    /// Appended to the test command (as `{coverage_args}`) when coverage is on.
    #[serde(default = "default_test_coverage_args")]
    pub test_coverage_args: String,

    /// Appended to the test command (as `{source_link_args}`) on server
    /// builds with coverage on.
    #[serde(default = "default_source_link_args")]
    pub source_link_args: String,

    #[serde(default = "default_report")]
    pub report: String,

    #[serde(default = "default_pack_descriptor")]
    pub pack_descriptor: String,

    #[serde(default = "default_pack_project")]
    pub pack_project: String,
}

fn default_restore() -> String {
    r#"msbuild "{solution}" -t:Restore"#.to_string()
}

fn default_compile() -> String {
    concat!(
        r#"msbuild "{solution}" -t:Rebuild -p:Configuration={configuration}"#,
        " -p:AssemblyVersion={assembly_version} -p:FileVersion={file_version}",
        r#" "-p:InformationalVersion={informational_version}""#,
        " -maxcpucount:{cpu_count} -nodeReuse:{node_reuse}",
    )
    .to_string()
}

fn default_test() -> String {
    concat!(
        r#"dotnet test "{project}" --framework {framework} --configuration {configuration}"#,
        r#" --output "{test_output_dir}" --no-build --results-directory "{test_results_dir}""#,
        r#" --logger "trx;LogFileName={project_name}.trx"{coverage_args}{source_link_args}"#,
    )
    .to_string()
}

fn default_test_coverage_args() -> String {
    concat!(
        " -p:CollectCoverage=true -p:CoverletOutputFormat=cobertura",
        r#" "-p:ExcludeByFile=*.Generated.cs" "-p:CoverletOutput={coverage_file}""#,
    )
    .to_string()
}

fn default_source_link_args() -> String {
    " -p:UseSourceLink=true".to_string()
}

fn default_report() -> String {
    r#"reportgenerator "-reports:{reports}" "-targetdir:{report_dir}" -reporttypes:HtmlInline"#
        .to_string()
}

fn default_pack_descriptor() -> String {
    concat!(
        r#"nuget pack "{descriptor}" -OutputDirectory "{artifacts_dir}" -Version {package_version}"#,
        " -Properties Configuration={configuration} -Symbols{build_flag}",
    )
    .to_string()
}

fn default_pack_project() -> String {
    concat!(
        r#"dotnet pack "{solution}" --no-build --include-symbols --configuration {configuration}"#,
        r#" --output "{artifacts_dir}" -p:PackageVersion={package_version}"#,
    )
    .to_string()
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            restore: default_restore(),
            compile: default_compile(),
            test: default_test(),
            test_coverage_args: default_test_coverage_args(),
            source_link_args: default_source_link_args(),
            report: default_report(),
            pack_descriptor: default_pack_descriptor(),
            pack_project: default_pack_project(),
        }
    }
}

/// `[version]` section: where package and assembly versions come from.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionSection {
    /// Command printing GitVersion-style JSON on stdout.
    #[serde(default = "default_version_command")]
    pub command: String,

    /// Fixed semantic version; takes precedence over `command`.
    #[serde(default)]
    pub fixed: Option<String>,
}

fn default_version_command() -> String {
    "dotnet-gitversion /output json".to_string()
}

impl Default for VersionSection {
    fn default() -> Self {
        Self {
            command: default_version_command(),
            fixed: None,
        }
    }
}

/// `[target.<name>]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TargetConfig {
    #[serde(default)]
    pub description: Option<String>,

    /// Predecessors: pulled into the run and executed first.
    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Ordering only: if both are in the run, this target goes first.
    #[serde(default)]
    pub before: Vec<String>,

    /// Ordering only: if both are in the run, this target goes last.
    #[serde(default)]
    pub after: Vec<String>,

    /// Run this target after any of the listed targets, when they are part
    /// of the run.
    #[serde(default)]
    pub triggered_by: Vec<String>,

    /// Glob patterns (relative to the build root) of expected outputs.
    #[serde(default)]
    pub produces: Vec<String>,

    /// Built-in action to run.
    #[serde(default)]
    pub action: Option<BuiltinAction>,

    /// Shell command to run instead of a built-in action.
    #[serde(default)]
    pub cmd: Option<String>,
}
