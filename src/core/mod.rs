pub mod classifier;
pub mod error;
pub mod extract;
pub mod file_handler;
pub mod ignore_patterns;
pub mod search;
pub mod walker;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Settings shared by both scan operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOptions {
    /// Process files on the rayon pool. Output order is unchanged.
    pub parallel: bool,
    /// `.gitignore`-style patterns pruned from the walk.
    pub ignore_patterns: HashSet<String>,
}

/// One line of a file that contains the search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub file_path: PathBuf,
    /// 1-based.
    pub line_number: usize,
    /// The line with surrounding whitespace trimmed.
    pub line_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonStatus {
    Passed,
    Failed,
}

impl ComparisonStatus {
    pub fn from_unequal_count(unequal_count: u64) -> Self {
        if unequal_count == 0 {
            Self::Passed
        } else {
            Self::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single comparison report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub file_path: PathBuf,
    pub status: ComparisonStatus,
    pub unequal_count: u64,
}

impl ComparisonResult {
    pub fn new(file_path: PathBuf, unequal_count: u64) -> Self {
        Self {
            file_path,
            status: ComparisonStatus::from_unequal_count(unequal_count),
            unequal_count,
        }
    }
}

pub use classifier::{CompareExtension, CompareOutcome, CompareRequest, ComparisonClassifier, StatusFilter};
pub use error::{CoreError, CoreResult};
pub use extract::{ExtractorRegistry, PdfExtractor, PlainTextExtractor, TextExtractor};
pub use file_handler::FileHandler;
pub use ignore_patterns::build_globset_from_patterns;
pub use search::{SearchExtension, SearchOutcome, SearchRequest, TextSearch};
pub use walker::{DirectoryWalker, ExtensionAllowList, FileWalk};
