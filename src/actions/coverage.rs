// src/actions/coverage.rs

use std::fs::{self, File};
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::engine::ActionEnv;
use crate::patterns::files_with_extension;

pub const PLACEHOLDERS: &[&str] = &[
    "reports",
    "report_dir",
    "test_results_dir",
    "root",
    "configuration",
    "solution",
];

/// Merge coverage data into a report, publish it and archive the report.
///
/// Without any coverage data file this is a successful no-op.
pub async fn run(env: &ActionEnv<'_>) -> Result<()> {
    let ctx = env.ctx;
    let paths = &ctx.paths;

    let reports = files_with_extension(&paths.test_results, "xml")?;
    if reports.is_empty() {
        info!(dir = %paths.test_results.display(), "no coverage data found, skipping");
        return Ok(());
    }

    fs::create_dir_all(&paths.coverage_report)
        .with_context(|| format!("creating {}", paths.coverage_report.display()))?;

    let joined = reports
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(";");
    let params = ctx
        .base_params()
        .with("reports", joined)
        .with("report_dir", paths.coverage_report.display())
        .with("test_results_dir", paths.test_results.display());
    let invocation = ctx.invocation(env.target, &ctx.tools.report, &params)?;
    ctx.runner().run(&invocation).await?;

    for report in &reports {
        ctx.sink().publish_code_coverage(report, &paths.coverage_report);
    }

    let entries = compress_dir(&paths.coverage_report, &paths.coverage_archive)?;
    info!(
        archive = %paths.coverage_archive.display(),
        entries,
        "coverage report archived"
    );
    Ok(())
}

/// Write every file under `src` into a zip archive at `dest`, replacing any
/// existing archive. Returns the number of files written.
pub fn compress_dir(src: &Path, dest: &Path) -> Result<usize> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(dest).with_context(|| format!("creating {}", dest.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut count = 0usize;
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", src.display()))?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        // Zip entry names always use forward slashes.
        let name = rel.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)
                .with_context(|| format!("adding directory {}", rel.display()))?;
        } else if entry.file_type().is_file() {
            debug!(file = %name, "compressing");
            zip.start_file(name, options)
                .with_context(|| format!("adding file {}", rel.display()))?;
            let mut input = File::open(entry.path())
                .with_context(|| format!("opening {}", entry.path().display()))?;
            io::copy(&mut input, &mut zip)
                .with_context(|| format!("compressing {}", entry.path().display()))?;
            count += 1;
        }
    }

    zip.finish().with_context(|| format!("finishing {}", dest.display()))?;
    Ok(count)
}
