//! Case-insensitive substring search across SAS programs, logs and text files.

use super::error::CoreResult;
use super::walker::{scan_files, DirectoryWalker, ExtensionAllowList};
use super::{FileHandler, ScanOptions, SearchMatch};
use crate::utils::file_detection::SEARCHABLE_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Extension filter offered for the text search.
///
/// `All` still only covers the searchable set (`.sas`, `.txt`, `.log`); the
/// other variants narrow it to a single extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchExtension {
    #[default]
    #[serde(rename = ".sas")]
    Sas,
    #[serde(rename = ".log")]
    Log,
    #[serde(rename = ".txt")]
    Txt,
    All,
}

impl SearchExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sas => ".sas",
            Self::Log => ".log",
            Self::Txt => ".txt",
            Self::All => "All",
        }
    }

    fn allow_list(&self) -> ExtensionAllowList {
        match self {
            Self::All => ExtensionAllowList::only(SEARCHABLE_EXTENSIONS.iter().copied()),
            single => ExtensionAllowList::only([single.as_str()]),
        }
    }
}

impl fmt::Display for SearchExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchExtension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            ".sas" | "sas" => Ok(Self::Sas),
            ".log" | "log" => Ok(Self::Log),
            ".txt" | "txt" => Ok(Self::Txt),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unsupported search extension '{}', expected one of .sas, .log, .txt, All",
                other
            )),
        }
    }
}

/// An immutable text search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub folder: PathBuf,
    /// Already trimmed.
    pub term: String,
    pub extension: SearchExtension,
}

impl SearchRequest {
    pub fn new(folder: impl Into<PathBuf>, term: &str, extension: SearchExtension) -> Self {
        Self {
            folder: folder.into(),
            term: term.trim().to_string(),
            extension,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub matches: Vec<SearchMatch>,
    /// Files that could be read, whether or not they matched.
    pub files_scanned: usize,
    pub matches_found: usize,
}

impl SearchOutcome {
    pub fn summary(&self) -> String {
        format!(
            "Found {} matches in {} file(s)",
            self.matches_found, self.files_scanned
        )
    }
}

/// Runs [`SearchRequest`]s against the file system.
#[derive(Debug, Clone, Default)]
pub struct TextSearch {
    options: ScanOptions,
}

impl TextSearch {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Searches every qualifying file below `request.folder`.
    ///
    /// Returns [`CoreError::InvalidFolder`](super::CoreError::InvalidFolder)
    /// if the folder does not exist. Files that cannot be read are skipped
    /// and not counted.
    pub fn run(&self, request: &SearchRequest) -> CoreResult<SearchOutcome> {
        tracing::info!(
            "Searching {} for '{}' in {} files",
            request.folder.display(),
            request.term,
            request.extension
        );
        let walker = DirectoryWalker::new(&request.folder, request.extension.allow_list())
            .with_ignore_patterns(&self.options);
        let files = walker.walk()?;

        let needle = request.term.to_lowercase();
        let per_file = scan_files(files, self.options.parallel, |path| {
            Self::search_file(path, &needle)
        });

        let files_scanned = per_file.len();
        let matches: Vec<SearchMatch> = per_file.into_iter().flatten().collect();
        let outcome = SearchOutcome {
            files_scanned,
            matches_found: matches.len(),
            matches,
        };
        tracing::info!("{}", outcome.summary());
        Ok(outcome)
    }

    /// Returns `None` when the file could not be read.
    fn search_file(path: &Path, needle: &str) -> Option<Vec<SearchMatch>> {
        let content = match FileHandler::read_text_lossy(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("Skipping file: {}", e);
                return None;
            }
        };
        Some(Self::search_text(path, &content, needle))
    }

    /// Collects every line of `content` whose lowercase form contains `needle`.
    ///
    /// `needle` must already be lowercase. An empty needle matches every line.
    /// Lines end at `\n`, `\r\n` or a lone `\r`.
    pub fn search_text(path: &Path, content: &str, needle: &str) -> Vec<SearchMatch> {
        split_lines(content)
            .into_iter()
            .enumerate()
            .filter(|(_, line)| line.to_lowercase().contains(needle))
            .map(|(idx, line)| SearchMatch {
                file_path: path.to_path_buf(),
                line_number: idx + 1,
                line_text: line.trim().to_string(),
            })
            .collect()
    }
}

/// Splits on `\n`, `\r\n` and `\r`. A trailing terminator does not start
/// an extra empty line.
fn split_lines(content: &str) -> Vec<&str> {
    let bytes = content.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&content[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&content[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&content[start..]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CoreError;
    use crate::utils::test_helpers::{running_as_root, setup_test_logging, write_file};
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn sas_program_with_error_on_line_12() -> String {
        let mut lines: Vec<String> = (1..=11).map(|i| format!("  x{} = {};", i, i)).collect();
        lines.push("   ERROR: bad value   ".to_string());
        lines.push("run;".to_string());
        lines.join("\n")
    }

    #[test]
    fn test_search_reports_line_number_and_trimmed_text() {
        setup_test_logging();
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "a.sas", sas_program_with_error_on_line_12());

        let request = SearchRequest::new(dir.path(), "  error ", SearchExtension::Sas);
        let outcome = TextSearch::default().run(&request).unwrap();

        assert_eq!(outcome.files_scanned, 1);
        assert_eq!(outcome.matches_found, 1);
        let hit = &outcome.matches[0];
        assert_eq!(hit.line_number, 12);
        assert_eq!(hit.line_text, "ERROR: bad value");
        assert_eq!(hit.file_path.file_name(), path.file_name());
        assert_eq!(outcome.summary(), "Found 1 matches in 1 file(s)");
    }

    #[test]
    fn test_all_never_widens_beyond_searchable_extensions() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "pgm.sas", "warning here");
        write_file(dir.path(), "run.LOG", "WARNING: here");
        write_file(dir.path(), "notes.txt", "no hit");
        write_file(dir.path(), "t_ae.lst", "warning in listing");
        write_file(dir.path(), "report.pdf", "warning in pdf");

        let request = SearchRequest::new(dir.path(), "warning", SearchExtension::All);
        let outcome = TextSearch::default().run(&request).unwrap();

        assert_eq!(outcome.files_scanned, 3);
        assert_eq!(outcome.matches_found, 2);
    }

    #[test]
    fn test_single_extension_narrows_the_set() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "pgm.sas", "proc print;");
        write_file(dir.path(), "pgm.log", "proc print;");

        let request = SearchRequest::new(dir.path(), "PROC", SearchExtension::Log);
        let outcome = TextSearch::default().run(&request).unwrap();

        assert_eq!(outcome.files_scanned, 1);
        assert!(outcome.matches[0].file_path.ends_with("pgm.log"));
    }

    #[test]
    fn test_empty_term_matches_every_line() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "x.txt", "one\n\nthree\n");

        let request = SearchRequest::new(dir.path(), "   ", SearchExtension::Txt);
        let outcome = TextSearch::default().run(&request).unwrap();

        assert_eq!(request.term, "");
        assert_eq!(outcome.matches_found, 3);
        let numbers: Vec<usize> = outcome.matches.iter().map(|m| m.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_undecodable_bytes_do_not_fail_the_file() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "legacy.log", b"NOTE: caf\xe9\nERROR: \xff missing\n".as_slice());

        let request = SearchRequest::new(dir.path(), "error:", SearchExtension::Log);
        let outcome = TextSearch::default().run(&request).unwrap();

        assert_eq!(outcome.matches_found, 1);
        assert_eq!(outcome.matches[0].line_number, 2);
        assert_eq!(outcome.matches[0].line_text, "ERROR:  missing");
    }

    #[test]
    fn test_invalid_folder_is_reported() {
        let dir = tempdir().unwrap();
        let request = SearchRequest::new(dir.path().join("gone"), "x", SearchExtension::All);
        let err = TextSearch::default().run(&request).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFolder(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_skipped_and_not_counted() {
        use std::os::unix::fs::PermissionsExt;
        if running_as_root() {
            return;
        }
        let dir = tempdir().unwrap();
        write_file(dir.path(), "ok.log", "ERROR: one");
        let locked = write_file(dir.path(), "locked.log", "ERROR: two");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        let request = SearchRequest::new(dir.path(), "error", SearchExtension::Log);
        let outcome = TextSearch::default().run(&request).unwrap();

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(outcome.files_scanned, 1);
        assert_eq!(outcome.matches_found, 1);
    }

    #[test]
    fn test_carriage_return_line_endings() {
        let path = Path::new("run.log");

        let mac = TextSearch::search_text(path, "NOTE: one\rNOTE: two\rERROR: three\r", "error");
        assert_eq!(mac.len(), 1);
        assert_eq!(mac[0].line_number, 3);
        assert_eq!(mac[0].line_text, "ERROR: three");

        let mixed = TextSearch::search_text(path, "ERROR: a\r\nok\rERROR: b\nok\n\nERROR: c", "error");
        let lines: Vec<(usize, &str)> = mixed
            .iter()
            .map(|m| (m.line_number, m.line_text.as_str()))
            .collect();
        assert_eq!(lines, vec![(1, "ERROR: a"), (3, "ERROR: b"), (6, "ERROR: c")]);
    }

    #[test]
    fn test_split_lines_matches_universal_newlines() {
        assert_eq!(split_lines(""), Vec::<&str>::new());
        assert_eq!(split_lines("a\r\n"), vec!["a"]);
        assert_eq!(split_lines("a\r\rb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\n\r\nb\r"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_unreadable_entries_are_skipped_as_any_user() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "ok.log", "ERROR: one");
        // A directory that looks like a log file cannot be read as text.
        std::fs::create_dir_all(dir.path().join("fake.log")).unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink(dir.path().join("gone.log"), dir.path().join("dangling.log"))
            .unwrap();

        let request = SearchRequest::new(dir.path(), "error", SearchExtension::Log);
        let outcome = TextSearch::default().run(&request).unwrap();

        assert_eq!(outcome.files_scanned, 1);
        assert_eq!(outcome.matches_found, 1);
        assert!(outcome.matches[0].file_path.ends_with("ok.log"));
    }

    #[test]
    fn test_parse_search_extension() {
        assert_eq!(".SAS".parse::<SearchExtension>(), Ok(SearchExtension::Sas));
        assert_eq!("all".parse::<SearchExtension>(), Ok(SearchExtension::All));
        assert!(".pdf".parse::<SearchExtension>().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_line_matches_iff_lowercase_contains(
            lines in prop::collection::vec("[a-zA-Z0-9 :;_=é]{0,16}", 0..12),
            term in "[a-zA-Z:é]{0,3}",
        ) {
            let content = lines.join("\n");
            let needle = term.to_lowercase();
            let hits = TextSearch::search_text(Path::new("p.sas"), &content, &needle);

            let expected: Vec<usize> = content
                .lines()
                .enumerate()
                .filter(|(_, l)| l.to_lowercase().contains(&needle))
                .map(|(i, _)| i + 1)
                .collect();
            let actual: Vec<usize> = hits.iter().map(|m| m.line_number).collect();
            prop_assert_eq!(&actual, &expected);
            if term.is_empty() {
                prop_assert_eq!(actual.len(), content.lines().count());
            }
        }
    }
}
