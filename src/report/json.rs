use std::path::Path;

use anyhow::Result;
use chrono::Utc;

use super::summary::DashboardSummary;
use super::types::{ExecutionRecord, ReportSummary};

/// Generate the JSON summary and write it to `output`, or stdout when no
/// path is given
pub fn generate(
    reports: &[ReportSummary],
    executions: &[ExecutionRecord],
    project_name: &str,
    output: Option<&Path>,
) -> Result<()> {
    let summary = DashboardSummary::build(reports, executions, project_name, Utc::now());
    let json = serde_json::to_string_pretty(&summary)?;

    if let Some(path) = output {
        std::fs::write(path, json)?;
        println!("JSON report saved to: {}", path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}
