use serde::{Deserialize, Serialize};

/// Fallback label for executions that carry no title
pub const UNTITLED_TEST: &str = "Untitled Test";

/// Aggregate pass/fail counts for one batch run, as produced by the
/// report storage backend. Counts default to zero when absent;
/// `total_passed + total_failed <= total_chats` is assumed upstream and
/// not enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(default)]
    pub timestamp_started: Option<String>,
    #[serde(default)]
    pub timestamp_completed: Option<String>,
    #[serde(default)]
    pub total_chats: u64,
    #[serde(default)]
    pub total_passed: u64,
    #[serde(default)]
    pub total_failed: u64,
}

/// Outcome of a single test execution within a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    #[serde(default)]
    pub chat_title: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub images: Vec<ExecutionImage>,
    #[serde(default)]
    pub batch_report_id: Option<String>,
}

/// Inline screenshot attached to an execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionImage {
    pub b64: String,
}

impl ExecutionRecord {
    /// Anything other than the literal status "failed" counts as passed
    pub fn is_failed(&self) -> bool {
        self.status == "failed"
    }

    pub fn title(&self) -> &str {
        self.chat_title.as_deref().unwrap_or(UNTITLED_TEST)
    }

    /// First attached image is the representative failure screenshot
    pub fn screenshot(&self) -> Option<&str> {
        self.images.first().map(|img| img.b64.as_str())
    }
}
