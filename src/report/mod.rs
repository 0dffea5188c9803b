pub mod chart;
pub mod html;
pub mod json;
pub mod junit;
pub mod summary;
pub mod types;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::utils::paths::ReportPaths;
use types::{ExecutionRecord, ReportSummary};

/// Load the two input collections from JSON files
pub fn load_inputs(
    reports_path: &Path,
    executions_path: &Path,
) -> Result<(Vec<ReportSummary>, Vec<ExecutionRecord>)> {
    let reports = std::fs::read_to_string(reports_path)
        .with_context(|| format!("Failed to read {}", reports_path.display()))?;
    let reports: Vec<ReportSummary> = serde_json::from_str(&reports)
        .with_context(|| format!("Invalid report summaries in {}", reports_path.display()))?;

    let executions = std::fs::read_to_string(executions_path)
        .with_context(|| format!("Failed to read {}", executions_path.display()))?;
    let executions: Vec<ExecutionRecord> = serde_json::from_str(&executions)
        .with_context(|| format!("Invalid execution records in {}", executions_path.display()))?;

    log::debug!(
        "Loaded {} reports and {} executions",
        reports.len(),
        executions.len()
    );

    Ok((reports, executions))
}

/// Generate a report in the requested format from the input files
pub fn generate_report(
    reports_path: &Path,
    executions_path: &Path,
    project_name: &str,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let (reports, executions) = load_inputs(reports_path, executions_path)?;

    match format {
        "html" => html::generate(&reports, &executions, project_name, output),
        "json" => json::generate(&reports, &executions, project_name, output),
        "junit" => junit::generate(&executions, project_name, output),
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}

/// Write the HTML dashboard and JUnit XML into the standard report layout
/// under `base_dir`
pub fn publish_reports(
    reports_path: &Path,
    executions_path: &Path,
    project_name: &str,
    base_dir: &Path,
) -> Result<()> {
    let (reports, executions) = load_inputs(reports_path, executions_path)?;

    let paths = ReportPaths::new(base_dir);
    paths.ensure_report_dirs(project_name)?;

    let html_path = paths.all_reports_html(project_name);
    let html = html::render_dashboard(&reports, &executions, project_name);
    std::fs::write(&html_path, html)
        .with_context(|| format!("Failed to write {}", html_path.display()))?;
    println!("HTML report saved to: {}", html_path.display());

    let xml_path = paths.all_reports_xml(project_name);
    let xml = junit::generate_junit_xml(&executions, project_name, &Utc::now().to_rfc3339())?;
    std::fs::write(&xml_path, xml)
        .with_context(|| format!("Failed to write {}", xml_path.display()))?;
    println!("JUnit report saved to: {}", xml_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let reports_path = dir.join("reports.json");
        let executions_path = dir.join("executions.json");
        std::fs::write(
            &reports_path,
            r#"[{"timestamp_started": "2024-01-01", "total_chats": 10, "total_passed": 7, "total_failed": 3}]"#,
        )
        .expect("Failed to write reports fixture");
        std::fs::write(
            &executions_path,
            r#"[{"chat_title": "Login", "status": "failed", "error_message": "boom"}]"#,
        )
        .expect("Failed to write executions fixture");
        (reports_path, executions_path)
    }

    #[test]
    fn test_load_inputs_round_trip() {
        let dir = std::env::temp_dir().join(format!("barko-load-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
        let (reports_path, executions_path) = write_inputs(&dir);

        let (reports, executions) =
            load_inputs(&reports_path, &executions_path).expect("Failed to load");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].total_chats, 10);
        assert_eq!(executions.len(), 1);
        assert!(executions[0].is_failed());

        std::fs::remove_dir_all(&dir).expect("Failed to clean up");
    }

    #[test]
    fn test_load_inputs_rejects_malformed_json() {
        let dir = std::env::temp_dir().join(format!("barko-badjson-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
        let bad = dir.join("bad.json");
        std::fs::write(&bad, "{not json").expect("Failed to write fixture");

        assert!(load_inputs(&bad, &bad).is_err());

        std::fs::remove_dir_all(&dir).expect("Failed to clean up");
    }

    #[test]
    fn test_publish_writes_standard_layout() {
        let dir = std::env::temp_dir().join(format!("barko-publish-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
        let (reports_path, executions_path) = write_inputs(&dir);
        let base = dir.join("Reports");

        publish_reports(&reports_path, &executions_path, "Demo", &base)
            .expect("Failed to publish");

        let html = std::fs::read_to_string(base.join("Demo/html/all.html"))
            .expect("Missing HTML output");
        assert!(html.contains("All Test Reports for Demo"));
        let xml =
            std::fs::read_to_string(base.join("Demo/junit/all.xml")).expect("Missing XML output");
        assert!(xml.contains(r#"<testcase name="Login""#));

        std::fs::remove_dir_all(&dir).expect("Failed to clean up");
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let dir = std::env::temp_dir().join(format!("barko-format-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
        let (reports_path, executions_path) = write_inputs(&dir);

        let err = generate_report(&reports_path, &executions_path, "Demo", "pdf", None)
            .expect_err("pdf should be rejected");
        assert!(err.to_string().contains("Unknown format"));

        std::fs::remove_dir_all(&dir).expect("Failed to clean up");
    }
}
