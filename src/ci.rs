// src/ci.rs

//! CI reporting sink.
//!
//! Test results and coverage files are handed to the CI server for display.
//! On Azure Pipelines that means printing logging commands on stdout; on
//! other hosts nothing is published.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::settings::BuildSettings;

/// Receives result files for display by the CI server.
pub trait CiSink: Send + Sync {
    fn publish_test_results(&self, title: &str, file: &Path);
    fn publish_code_coverage(&self, summary_file: &Path, report_dir: &Path);
}

/// Sink used outside of a supported CI server.
#[derive(Debug, Clone, Default)]
pub struct NullSink;

impl CiSink for NullSink {
    fn publish_test_results(&self, title: &str, file: &Path) {
        debug!(title, file = %file.display(), "no CI sink; not publishing test results");
    }

    fn publish_code_coverage(&self, summary_file: &Path, _report_dir: &Path) {
        debug!(file = %summary_file.display(), "no CI sink; not publishing coverage");
    }
}

/// Azure Pipelines `##vso[...]` logging commands.
#[derive(Debug, Clone, Default)]
pub struct AzurePipelinesSink;

impl AzurePipelinesSink {
    pub fn test_results_command(title: &str, file: &Path) -> String {
        format!(
            "##vso[results.publish type=VSTest;runTitle={};resultFiles={};]",
            title,
            file.display()
        )
    }

    pub fn code_coverage_command(summary_file: &Path, report_dir: &Path) -> String {
        format!(
            "##vso[codecoverage.publish codecoveragetool=Cobertura;summaryfile={};reportdirectory={};]",
            summary_file.display(),
            report_dir.display()
        )
    }
}

impl CiSink for AzurePipelinesSink {
    fn publish_test_results(&self, title: &str, file: &Path) {
        println!("{}", Self::test_results_command(title, file));
    }

    fn publish_code_coverage(&self, summary_file: &Path, report_dir: &Path) {
        println!("{}", Self::code_coverage_command(summary_file, report_dir));
    }
}

/// Pick the sink for the resolved settings.
pub fn sink_for(settings: &BuildSettings) -> Arc<dyn CiSink> {
    if settings.azure_pipelines {
        Arc::new(AzurePipelinesSink)
    } else {
        Arc::new(NullSink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn azure_commands_name_the_files() {
        let cmd = AzurePipelinesSink::test_results_command(
            "MyLib.Tests (Build)",
            Path::new("/a/MyLib.Tests.trx"),
        );
        assert_eq!(
            cmd,
            "##vso[results.publish type=VSTest;runTitle=MyLib.Tests (Build);resultFiles=/a/MyLib.Tests.trx;]"
        );

        let cmd = AzurePipelinesSink::code_coverage_command(
            Path::new("/a/MyLib.Tests.xml"),
            Path::new("/a/report"),
        );
        assert!(cmd.contains("summaryfile=/a/MyLib.Tests.xml"));
        assert!(cmd.contains("reportdirectory=/a/report"));
    }
}
