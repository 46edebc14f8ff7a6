use anyhow::Result;
use chrono::Utc;
use std::path::Path;

use crate::analyzer::Analyzer;
use crate::models::{FileFindings, RunReport};
use crate::suppression::{SuppressionConfig, load_suppression_if_present};
use crate::utils::expand_paths;
use crate::validate::validate_file;

/// Options for one lint run.
pub struct LintOptions<'a> {
    pub config: Option<&'a str>,
    pub config_is_optional: bool,
    pub format: &'a str,
    pub output_file: Option<&'a str>,
    pub quiet: bool,
    pub verbose: bool,
}

/// Lint every Terraform file the path arguments expand to.
/// Returns true if any file produced a retained finding.
pub fn lint(paths: &[String], analyzer: &dyn Analyzer, options: &LintOptions) -> Result<bool> {
    let suppression = match options.config {
        Some(config) => load_suppression_if_present(Path::new(config), options.config_is_optional)?,
        None => None,
    };

    let report = check_files(paths, analyzer, suppression.as_ref())?;

    match options.format {
        "json" => crate::output::output_json(&report, options.output_file)?,
        _ => crate::output::output_terminal(&report, options.quiet, options.verbose)?,
    }

    Ok(report.has_findings())
}

/// Validate each file in order and fold the results into a report.
pub fn check_files(
    paths: &[String],
    analyzer: &dyn Analyzer,
    suppression: Option<&SuppressionConfig>,
) -> Result<RunReport> {
    let mut files = Vec::new();
    for path in expand_paths(paths) {
        let findings = validate_file(&path, analyzer, suppression)?;
        files.push(FileFindings {
            path: path.display().to_string(),
            findings,
        });
    }

    let total_findings = files.iter().map(|f| f.findings.len()).sum();
    let files_with_findings = files.iter().filter(|f| !f.findings.is_empty()).count();

    Ok(RunReport {
        checked_at: Utc::now().to_rfc3339(),
        total_files_checked: files.len(),
        files_with_findings,
        total_findings,
        files,
    })
}
