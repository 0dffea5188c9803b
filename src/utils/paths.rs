use std::path::{Path, PathBuf};

use anyhow::Result;
use regex::Regex;

/// Filenames longer than this are cut before writing
const MAX_NAME_LENGTH: usize = 50;

/// Standard on-disk layout for generated reports:
/// `<base>/<project>/html/all.html` and `<base>/<project>/junit/all.xml`
pub struct ReportPaths {
    base_dir: PathBuf,
}

impl Default for ReportPaths {
    fn default() -> Self {
        Self::new("Reports")
    }
}

impl ReportPaths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn all_reports_html(&self, project_name: &str) -> PathBuf {
        self.base_dir
            .join(sanitize_name(project_name))
            .join("html")
            .join("all.html")
    }

    pub fn all_reports_xml(&self, project_name: &str) -> PathBuf {
        self.base_dir
            .join(sanitize_name(project_name))
            .join("junit")
            .join("all.xml")
    }

    pub fn ensure_report_dirs(&self, project_name: &str) -> Result<()> {
        let project_dir = self.base_dir.join(sanitize_name(project_name));
        std::fs::create_dir_all(project_dir.join("html"))?;
        std::fs::create_dir_all(project_dir.join("junit"))?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Make a display name safe to use as a path component: filesystem
/// metacharacters become underscores, whitespace runs collapse, and the
/// result is capped at 50 characters
pub fn sanitize_name(name: &str) -> String {
    let invalid = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
    let whitespace = Regex::new(r"\s+").unwrap();

    let sanitized = invalid.replace_all(name, "_");
    let sanitized = whitespace.replace_all(&sanitized, " ");
    let mut sanitized = sanitized.trim().to_string();

    if sanitized.chars().count() > MAX_NAME_LENGTH {
        sanitized = sanitized
            .chars()
            .take(MAX_NAME_LENGTH)
            .collect::<String>()
            .trim()
            .to_string();
    }

    if sanitized.is_empty() {
        "unnamed".to_string()
    } else {
        sanitized
    }
}
