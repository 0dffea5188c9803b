use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

use super::types::{ExecutionRecord, ReportSummary};

/// Placeholder rendered wherever a value is absent
pub const NOT_AVAILABLE: &str = "N/A";

/// How many tests the "Top Failing Tests" table shows
pub const TOP_FAILING_LIMIT: usize = 5;

/// Per-test rollup of every execution seen across all batch runs in scope.
/// Rebuilt from scratch on each render; `runs == passed + failed` always.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestAggregate {
    pub title: String,
    pub runs: u64,
    pub passed: u64,
    pub failed: u64,
    pub last_error: Option<String>,
    pub last_error_screenshot: Option<String>,
    /// Distinct batch report ids this test appeared in. Collected but not
    /// rendered in the HTML view; surfaced only through the JSON summary.
    pub reports: BTreeSet<String>,
}

impl TestAggregate {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            runs: 0,
            passed: 0,
            failed: 0,
            last_error: None,
            last_error_screenshot: None,
            reports: BTreeSet::new(),
        }
    }
}

/// Everything the dashboard shows, minus the markup. This is also the
/// payload of the JSON output format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub project_name: String,
    pub generated_at: String,
    pub last_run: Option<String>,
    pub total_reports: usize,
    pub total_runs: u64,
    pub total_passed: u64,
    pub total_failed: u64,
    pub unique_tests: usize,
    pub failing_tests: usize,
    pub tests: Vec<TestAggregate>,
}

impl DashboardSummary {
    pub fn build(
        reports: &[ReportSummary],
        executions: &[ExecutionRecord],
        project_name: &str,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let total_passed: u64 = reports.iter().map(|r| r.total_passed).sum();
        let total_failed: u64 = reports.iter().map(|r| r.total_failed).sum();

        let tests = aggregate_executions(executions);
        let failing_tests = tests.iter().filter(|t| t.failed > 0).count();

        log::debug!(
            "Aggregated {} executions into {} unique tests ({} failing)",
            executions.len(),
            tests.len(),
            failing_tests
        );

        Self {
            project_name: project_name.to_string(),
            generated_at: generated_at.to_rfc2822(),
            last_run: last_run_timestamp(reports).map(|dt| dt.to_rfc2822()),
            total_reports: reports.len(),
            total_runs: total_passed + total_failed,
            total_passed,
            total_failed,
            unique_tests: tests.len(),
            failing_tests,
            tests,
        }
    }
}

/// Group executions by title, preserving input iteration order. Records
/// carry no per-execution timestamp, so "last error" means last in input
/// order: later failing executions overwrite earlier error details.
pub fn aggregate_executions(executions: &[ExecutionRecord]) -> Vec<TestAggregate> {
    let mut aggregates: Vec<TestAggregate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for exec in executions {
        let title = exec.title();
        let slot = *index.entry(title.to_string()).or_insert_with(|| {
            aggregates.push(TestAggregate::new(title));
            aggregates.len() - 1
        });
        let agg = &mut aggregates[slot];

        agg.runs += 1;
        if exec.is_failed() {
            agg.failed += 1;
            agg.last_error = exec.error_message.clone();
            agg.last_error_screenshot = exec.screenshot().map(str::to_string);
        } else {
            agg.passed += 1;
        }
        if let Some(id) = &exec.batch_report_id {
            agg.reports.insert(id.clone());
        }
    }

    aggregates
}

/// Failing tests ranked by failure count, capped at `limit`. The sort is
/// stable so ties keep their grouping-insertion order.
pub fn top_failing(aggregates: &[TestAggregate], limit: usize) -> Vec<&TestAggregate> {
    let mut failing: Vec<&TestAggregate> = aggregates.iter().filter(|t| t.failed > 0).collect();
    failing.sort_by(|a, b| b.failed.cmp(&a.failed));
    failing.truncate(limit);
    failing
}

/// Reports in chronological order of `timestamp_started`. Stable sort;
/// entries with a missing or unparseable timestamp sort first.
pub fn sort_reports_ascending(reports: &[ReportSummary]) -> Vec<ReportSummary> {
    let mut sorted = reports.to_vec();
    sorted.sort_by_key(|r| r.timestamp_started.as_deref().and_then(parse_timestamp));
    sorted
}

/// Latest completion time across all reports, falling back to the start
/// time for reports that never completed
pub fn last_run_timestamp(reports: &[ReportSummary]) -> Option<DateTime<Utc>> {
    reports
        .iter()
        .filter_map(|r| {
            r.timestamp_completed
                .as_deref()
                .or(r.timestamp_started.as_deref())
                .and_then(parse_timestamp)
        })
        .max()
}

/// Lenient parser for the timestamp shapes the backend emits
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

/// Short date label for chart axes ("2024-01-01")
pub(crate) fn day_label(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(parse_timestamp)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Full date-time label for table rows ("2024-01-01 10:30:00")
pub(crate) fn date_time_label(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(parse_timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
