use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::types::ExecutionRecord;

/// Generate the JUnit XML report and write it to `output`, or stdout when
/// no path is given
pub fn generate(
    executions: &[ExecutionRecord],
    project_name: &str,
    output: Option<&Path>,
) -> Result<()> {
    let xml = generate_junit_xml(executions, project_name, &Utc::now().to_rfc3339())?;

    if let Some(path) = output {
        std::fs::write(path, xml)?;
        println!("JUnit report saved to: {}", path.display());
    } else {
        println!("{}", xml);
    }

    Ok(())
}

/// Generate JUnit XML from execution records, one testcase per execution.
/// The input model carries no durations, so suite time is reported as zero.
pub fn generate_junit_xml(
    executions: &[ExecutionRecord],
    project_name: &str,
    timestamp: &str,
) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total_tests = executions.len();
    let failures = executions.iter().filter(|e| e.is_failed()).count();

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", project_name));
    suites_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suites_start.push_attribute(("failures", failures.to_string().as_str()));
    suites_start.push_attribute(("errors", "0"));
    suites_start.push_attribute(("time", "0.000"));
    writer.write_event(Event::Start(suites_start))?;

    // Single <testsuite> covering the whole batch history
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", project_name));
    suite_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suite_start.push_attribute(("failures", failures.to_string().as_str()));
    suite_start.push_attribute(("errors", "0"));
    suite_start.push_attribute(("time", "0.000"));
    suite_start.push_attribute(("timestamp", timestamp));
    writer.write_event(Event::Start(suite_start))?;

    for execution in executions {
        write_test_case(&mut writer, execution, project_name)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    let xml = String::from_utf8(result)?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    execution: &ExecutionRecord,
    project_name: &str,
) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", execution.title()));
    case_start.push_attribute(("classname", project_name));
    case_start.push_attribute(("time", "0.000"));
    writer.write_event(Event::Start(case_start))?;

    if execution.is_failed() {
        let mut fail_start = BytesStart::new("failure");
        fail_start.push_attribute(("message", "Test failed"));
        fail_start.push_attribute(("type", "AssertionError"));
        writer.write_event(Event::Start(fail_start))?;

        if let Some(error) = &execution.error_message {
            let sanitized = sanitize_output(error);
            writer.write_event(Event::Text(BytesText::new(&sanitized)))?;
        }

        writer.write_event(Event::End(BytesEnd::new("failure")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Strip control characters XML cannot carry, keeping line structure
fn sanitize_output(output: &str) -> String {
    output
        .chars()
        .filter(|c| *c >= ' ' || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn execution(title: &str, status: &str, error: Option<&str>) -> ExecutionRecord {
        ExecutionRecord {
            chat_title: Some(title.to_string()),
            status: status.to_string(),
            error_message: error.map(str::to_string),
            images: vec![],
            batch_report_id: None,
        }
    }

    #[test]
    fn test_generate_junit_xml() {
        let executions = vec![
            execution("Login Flow", "passed", None),
            execution("Checkout Flow", "failed", Some("Element not found")),
        ];

        let xml = generate_junit_xml(&executions, "Demo Project", "2024-01-01T12:00:00Z")
            .expect("Failed to generate XML");

        assert!(xml.contains(r#"<testsuites name="Demo Project""#));
        assert!(xml.contains(r#"tests="2""#));
        assert!(xml.contains(r#"failures="1""#));
        assert!(xml.contains(r#"<testcase name="Login Flow""#));
        assert!(xml.contains(r#"message="Test failed""#));
        assert!(xml.contains("Element not found"));
    }

    #[test]
    fn test_untitled_execution_gets_fallback_name() {
        let mut exec = execution("x", "passed", None);
        exec.chat_title = None;

        let xml = generate_junit_xml(&[exec], "Demo", "2024-01-01T12:00:00Z")
            .expect("Failed to generate XML");
        assert!(xml.contains(r#"<testcase name="Untitled Test""#));
    }

    #[test]
    fn test_failure_text_strips_control_characters() {
        let executions = vec![execution(
            "Flaky",
            "failed",
            Some("line one\nline two\u{0007}\u{0000} end"),
        )];

        let xml = generate_junit_xml(&executions, "Demo", "2024-01-01T12:00:00Z")
            .expect("Failed to generate XML");
        assert!(xml.contains("line one\nline two end"));
        assert!(!xml.contains('\u{0007}'));
    }

    #[test]
    fn test_empty_executions_produce_empty_suite() {
        let xml = generate_junit_xml(&[], "Demo", "2024-01-01T12:00:00Z")
            .expect("Failed to generate XML");
        assert!(xml.contains(r#"tests="0""#));
        assert!(!xml.contains("<testcase"));
    }
}
