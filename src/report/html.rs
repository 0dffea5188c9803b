use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::chart;
use super::summary::{
    date_time_label, sort_reports_ascending, top_failing, DashboardSummary, NOT_AVAILABLE,
    TOP_FAILING_LIMIT,
};
use super::types::{ExecutionRecord, ReportSummary};

/// Generate the HTML dashboard and write it to `output`, or stdout when
/// no path is given
pub fn generate(
    reports: &[ReportSummary],
    executions: &[ExecutionRecord],
    project_name: &str,
    output: Option<&Path>,
) -> Result<()> {
    let html = render_dashboard(reports, executions, project_name);

    if let Some(path) = output {
        std::fs::write(path, html)?;
        println!("HTML report saved to: {}", path.display());
    } else {
        println!("{}", html);
    }

    Ok(())
}

/// Render the full dashboard document stamped with the current time
pub fn render_dashboard(
    reports: &[ReportSummary],
    executions: &[ExecutionRecord],
    project_name: &str,
) -> String {
    render_dashboard_at(reports, executions, project_name, Utc::now())
}

/// Render with an explicit generation timestamp. Output is byte-stable
/// for identical inputs and the same `generated_at`.
pub fn render_dashboard_at(
    reports: &[ReportSummary],
    executions: &[ExecutionRecord],
    project_name: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let sorted = sort_reports_ascending(reports);
    let summary = DashboardSummary::build(reports, executions, project_name, generated_at);
    let last_run = summary.last_run.as_deref().unwrap_or(NOT_AVAILABLE);

    let mut failing_rows = String::new();
    for test in top_failing(&summary.tests, TOP_FAILING_LIMIT) {
        let error_html = test
            .last_error
            .as_deref()
            .map(html_escape)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let screenshot_html = match test.last_error_screenshot.as_deref() {
            Some(b64) => format!(
                r#"<img src="data:image/png;base64,{}" class="screenshot" alt="Screenshot">"#,
                html_escape(b64)
            ),
            None => NOT_AVAILABLE.to_string(),
        };

        failing_rows.push_str(&format!(
            r#"
              <tr>
                <td>{title}</td>
                <td>{runs}</td>
                <td class="status-failed">{failed}</td>
                <td class="status-passed">{passed}</td>
                <td><pre>{error}</pre></td>
                <td>{screenshot}</td>
              </tr>
            "#,
            title = html_escape(&test.title),
            runs = test.runs,
            failed = test.failed,
            passed = test.passed,
            error = error_html,
            screenshot = screenshot_html,
        ));
    }

    // Overview lists newest first, the reverse of the chart's axis
    let mut overview_rows = String::new();
    for report in sorted.iter().rev() {
        overview_rows.push_str(&format!(
            r#"
              <tr>
                <td>Report from {date}</td>
                <td>{total}</td>
                <td class="status-passed">{passed}</td>
                <td class="status-failed">{failed}</td>
              </tr>
            "#,
            date = date_time_label(report.timestamp_started.as_deref()),
            total = report.total_chats,
            passed = report.total_passed,
            failed = report.total_failed,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>All Test Reports - {project}</title>
  <style>
{style}
  </style>
</head>
<body>
  <div class="container">
    <h1>All Test Reports for {project}</h1>
    <p>Generated on: {generated_at}</p>
    <p>Last Run Timestamp: {last_run}</p>

    <h2>Aggregated Statistics</h2>
    <div class="header-stats">
      <div class="stat-box"><div class="stat-title">Total Reports</div><div class="stat-value">{total_reports}</div></div>
      <div class="stat-box"><div class="stat-title">Total Test Runs</div><div class="stat-value">{total_runs}</div></div>
      <div class="stat-box"><div class="stat-title">Passed Runs</div><div class="stat-value status-passed">{total_passed}</div></div>
      <div class="stat-box"><div class="stat-title">Failed Runs</div><div class="stat-value status-failed">{total_failed}</div></div>
      <div class="stat-box"><div class="stat-title">Unique Tests</div><div class="stat-value">{unique_tests}</div></div>
      <div class="stat-box"><div class="stat-title">Tests Failing</div><div class="stat-value status-failed">{failing_tests}</div></div>
    </div>

    <div class="chart-container">
        <h3>Pass / Fail Chart</h3>
        {chart}
    </div>

    <h2>Top Failing Tests</h2>
    <table>
      <thead><tr><th>Test Title</th><th>Total Runs</th><th>Failed</th><th>Passed</th><th>Last Error</th><th>Screenshot</th></tr></thead>
      <tbody>
        {failing_rows}
      </tbody>
    </table>

    <h2>Reports Overview</h2>
    <table>
      <thead><tr><th>Report Name/Date</th><th>Total Tests</th><th>Passed</th><th>Failed</th></tr></thead>
      <tbody>
        {overview_rows}
      </tbody>
    </table>

    <div class="footer">
      <p>Barko Agent Report</p>
    </div>
  </div>
</body>
</html>
"#,
        project = html_escape(project_name),
        style = STYLE,
        generated_at = summary.generated_at,
        last_run = last_run,
        total_reports = summary.total_reports,
        total_runs = summary.total_runs,
        total_passed = summary.total_passed,
        total_failed = summary.total_failed,
        unique_tests = summary.unique_tests,
        failing_tests = summary.failing_tests,
        chart = chart::render_bar_chart(&sorted),
        failing_rows = failing_rows,
        overview_rows = overview_rows,
    )
}

const STYLE: &str = r#"    :root {
        --color-pass: #1e8e3e; --color-fail: #d93025; --color-other: #5f6368;
        --bg-pass: #e6f4ea; --bg-fail: #fce8e6; --bg-other: #f1f3f4;
        --border-color: #dadce0; --text-color: #202124; --text-color-light: #5f6368;
        --panel-bg: #f8f9fa; --body-bg: #ffffff;
    }
    body { font-family: Arial, sans-serif; margin: 20px; background-color: var(--body-bg); color: var(--text-color); }
    .container { max-width: 1200px; margin: auto; background: #fff; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
    h1, h2, h3 { color: var(--text-color); border-bottom: 2px solid #eee; padding-bottom: 10px; margin-top: 25px; }
    table { width: 100%; border-collapse: collapse; margin-bottom: 20px; font-size: 14px; }
    th, td { padding: 12px; border: 1px solid var(--border-color); text-align: left; }
    th { background-color: var(--panel-bg); }
    .status-passed { color: var(--color-pass); font-weight: bold; }
    .status-failed { color: var(--color-fail); font-weight: bold; }
    .screenshot { max-width: 80px; max-height: 60px; border-radius: 4px; border: 1px solid var(--border-color); }
    .header-stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 15px; margin-bottom: 20px; }
    .stat-box { background: var(--panel-bg); padding: 15px; border-radius: 8px; border: 1px solid var(--border-color); }
    .stat-title { font-weight: bold; color: var(--text-color-light); }
    .stat-value { font-size: 1.8em; font-weight: bold; color: var(--text-color); margin-top: 5px; }
    .footer { font-size: 0.9em; color: #777; margin-top: 20px; text-align: center; }
    pre { white-space: pre-wrap; word-break: break-all; font-size: 0.9em; max-height: 100px; overflow-y: auto; background: #f1f3f4; padding: 5px; border-radius: 4px; }
    .chart-container { background-color: var(--panel-bg); padding: 20px; border-radius: 8px; margin-top: 20px; text-align: center; border: 1px solid var(--border-color); }"#;

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
