//! Display-ready rows and status lines for the two result lists.

use crate::core::{
    ComparisonResult, ComparisonStatus, CompareOutcome, CoreError, SearchMatch, SearchOutcome,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Row background for passed reports.
pub const PASSED_COLOR: &str = "#c6f6c6";
/// Row background for failed reports.
pub const FAILED_COLOR: &str = "#f6c6c6";

pub const INVALID_FOLDER_WARNING: &str = "Invalid folder";

/// A selectable entry in a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub label: String,
    pub path: PathBuf,
    /// Present for search hits; comparison rows open at the top of the file.
    pub line: Option<usize>,
    pub status: Option<ComparisonStatus>,
    pub color: Option<&'static str>,
}

/// The rendered state of one result list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub rows: Vec<ResultRow>,
    pub status_line: String,
    /// Set instead of rows when the scan could not run.
    pub warning: Option<String>,
}

impl ResultView {
    pub fn from_error(error: &CoreError) -> Self {
        let warning = match error {
            CoreError::InvalidFolder(_) => INVALID_FOLDER_WARNING.to_string(),
            other => other.to_string(),
        };
        Self {
            rows: Vec::new(),
            status_line: format!("⚠️ {}", warning),
            warning: Some(warning),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn status_color(status: ComparisonStatus) -> &'static str {
    match status {
        ComparisonStatus::Passed => PASSED_COLOR,
        ComparisonStatus::Failed => FAILED_COLOR,
    }
}

pub fn search_row(hit: &SearchMatch) -> ResultRow {
    ResultRow {
        label: format!(
            "{} [Line {}]: {}",
            display_name(&hit.file_path),
            hit.line_number,
            hit.line_text
        ),
        path: hit.file_path.clone(),
        line: Some(hit.line_number),
        status: None,
        color: None,
    }
}

pub fn comparison_row(result: &ComparisonResult) -> ResultRow {
    ResultRow {
        label: format!("{}: {}", display_name(&result.file_path), result.status),
        path: result.file_path.clone(),
        line: None,
        status: Some(result.status),
        color: Some(status_color(result.status)),
    }
}

pub fn search_view(outcome: &SearchOutcome) -> ResultView {
    ResultView {
        rows: outcome.matches.iter().map(search_row).collect(),
        status_line: format!("✅ {}", outcome.summary()),
        warning: None,
    }
}

pub fn compare_view(outcome: &CompareOutcome) -> ResultView {
    ResultView {
        rows: outcome.displayed.iter().map(comparison_row).collect(),
        status_line: format!("🧾 {}", outcome.summary()),
        warning: None,
    }
}
