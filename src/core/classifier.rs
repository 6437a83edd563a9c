//! PROC COMPARE report classification.
//!
//! A report passes when the "Number of Observations with Some Compared
//! Variables Unequal" count is zero and fails otherwise. Reports without the
//! marker phrase are not comparison output and are ignored entirely.

use super::error::CoreResult;
use super::extract::ExtractorRegistry;
use super::walker::{scan_files, DirectoryWalker, ExtensionAllowList};
use super::{ComparisonResult, ComparisonStatus, ScanOptions};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

const MARKER_PATTERN: &str =
    r"(?i)Number of Observations with Some Compared Variables Unequal:\s+([0-9]+)";

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(MARKER_PATTERN).expect("marker pattern is valid"))
}

/// Extension filter offered for the comparison check. `All` disables
/// extension filtering completely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompareExtension {
    #[default]
    #[serde(rename = ".pdf")]
    Pdf,
    #[serde(rename = ".lst")]
    Lst,
    #[serde(rename = ".txt")]
    Txt,
    All,
}

impl CompareExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Lst => ".lst",
            Self::Txt => ".txt",
            Self::All => "All",
        }
    }

    fn allow_list(&self) -> ExtensionAllowList {
        match self {
            Self::All => ExtensionAllowList::All,
            single => ExtensionAllowList::only([single.as_str()]),
        }
    }
}

impl fmt::Display for CompareExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompareExtension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            ".pdf" | "pdf" => Ok(Self::Pdf),
            ".lst" | "lst" => Ok(Self::Lst),
            ".txt" | "txt" => Ok(Self::Txt),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unsupported compare extension '{}', expected one of .pdf, .lst, .txt, All",
                other
            )),
        }
    }
}

/// Which classified reports are returned for display. Never affects counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Passed,
    Failed,
}

impl StatusFilter {
    pub fn shows(&self, status: ComparisonStatus) -> bool {
        match self {
            Self::All => true,
            Self::Passed => status == ComparisonStatus::Passed,
            Self::Failed => status == ComparisonStatus::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Passed => "Passed",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "passed" | "pass" => Ok(Self::Passed),
            "failed" | "fail" => Ok(Self::Failed),
            other => Err(format!(
                "unsupported status filter '{}', expected one of All, Passed, Failed",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRequest {
    pub folder: PathBuf,
    pub extension: CompareExtension,
    pub status_filter: StatusFilter,
}

impl CompareRequest {
    pub fn new(
        folder: impl Into<PathBuf>,
        extension: CompareExtension,
        status_filter: StatusFilter,
    ) -> Self {
        Self {
            folder: folder.into(),
            extension,
            status_filter,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompareOutcome {
    /// Results that passed the status filter, in walk order.
    pub displayed: Vec<ComparisonResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl CompareOutcome {
    fn record(&mut self, result: ComparisonResult, filter: StatusFilter) {
        match result.status {
            ComparisonStatus::Passed => self.passed += 1,
            ComparisonStatus::Failed => self.failed += 1,
        }
        self.total += 1;
        if filter.shows(result.status) {
            self.displayed.push(result);
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Scanned {} files → {} Passed | {} Failed",
            self.total, self.passed, self.failed
        )
    }
}

/// Classifies PROC COMPARE reports found below a folder.
#[derive(Debug, Default)]
pub struct ComparisonClassifier {
    options: ScanOptions,
    extractors: ExtractorRegistry,
}

impl ComparisonClassifier {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            extractors: ExtractorRegistry::default(),
        }
    }

    /// Replaces the extractor registry, e.g. to plug in another document format.
    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn run(&self, request: &CompareRequest) -> CoreResult<CompareOutcome> {
        tracing::info!(
            "Checking comparison reports in {} ({} files, showing {})",
            request.folder.display(),
            request.extension,
            request.status_filter
        );
        let walker = DirectoryWalker::new(&request.folder, request.extension.allow_list())
            .with_ignore_patterns(&self.options);
        let files = walker.walk()?;

        let classified = scan_files(files, self.options.parallel, |path| self.classify_file(path));

        let mut outcome = CompareOutcome::default();
        for result in classified {
            outcome.record(result, request.status_filter);
        }
        tracing::info!("{}", outcome.summary());
        Ok(outcome)
    }

    /// Returns `None` for unreadable files and files without the marker phrase.
    fn classify_file(&self, path: &Path) -> Option<ComparisonResult> {
        let content = match self.extractors.extract(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("Skipping file: {}", e);
                return None;
            }
        };
        match Self::unequal_count(&content) {
            Some(count) => Some(ComparisonResult::new(path.to_path_buf(), count)),
            None => {
                tracing::debug!("No comparison summary in {}", path.display());
                None
            }
        }
    }

    /// Extracts the unequal-observation count from the first marker phrase.
    ///
    /// Counts that do not fit in a `u64` saturate, which still classifies the
    /// report as failed.
    pub fn unequal_count(content: &str) -> Option<u64> {
        let captures = marker_regex().captures(content)?;
        let digits = captures.get(1)?.as_str();
        Some(digits.parse().unwrap_or(u64::MAX))
    }
}
