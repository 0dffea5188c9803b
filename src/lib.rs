pub mod report;
pub mod utils;

// Re-export common items
pub use report::html::render_dashboard;
pub use report::{generate_report, publish_reports};
