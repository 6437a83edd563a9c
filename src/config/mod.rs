pub mod settings;

use crate::core::{CompareExtension, ScanOptions, SearchExtension, StatusFilter};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Notepad++ default install location, used when no editor is configured on Windows.
#[cfg(windows)]
const DEFAULT_EDITOR: Option<&str> = Some(r"C:\Program Files\Notepad++\notepad++.exe");
#[cfg(not(windows))]
const DEFAULT_EDITOR: Option<&str> = None;

/// Argument template passed before the file path when a line is known.
pub const DEFAULT_LINE_ARG: &str = "-n{line}";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub last_directory: Option<PathBuf>,
    /// Editor executable. `None` opens files with the system default application.
    pub editor_program: Option<String>,
    /// `{line}` is replaced with the 1-based line number.
    pub editor_line_arg: String,
    pub search_extension: SearchExtension,
    pub compare_extension: CompareExtension,
    pub status_filter: StatusFilter,
    pub parallel_scan: bool,
    pub ignore_patterns: HashSet<String>,
}

impl AppConfig {
    pub fn load(custom_path: Option<&Path>) -> Result<Self> {
        settings::load_config(custom_path)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            parallel: self.parallel_scan,
            ignore_patterns: self.ignore_patterns.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            last_directory: None,
            editor_program: DEFAULT_EDITOR.map(str::to_string),
            editor_line_arg: DEFAULT_LINE_ARG.to_string(),
            search_extension: SearchExtension::Sas,
            compare_extension: CompareExtension::Pdf,
            status_filter: StatusFilter::All,
            parallel_scan: false,
            ignore_patterns: HashSet::new(),
        }
    }
}
