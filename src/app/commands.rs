//! Handlers invoked by the presentation layer.
//!
//! Each handler takes an immutable request, runs the matching core operation
//! and turns the result (or the failure) into a [`ResultView`]. Nothing here
//! keeps state between calls.

use super::editor::{open_file_line, EditorLauncher, OpenOutcome};
use super::view_model::{compare_view, search_view, ResultRow, ResultView};
use crate::config::{self, AppConfig};
use crate::core::{CompareRequest, ComparisonClassifier, SearchRequest, TextSearch};
use std::path::Path;

/// Runs a text search. An invalid folder yields an empty view with a warning.
pub fn run_text_search(search: &TextSearch, request: &SearchRequest) -> ResultView {
    match search.run(request) {
        Ok(outcome) => search_view(&outcome),
        Err(e) => {
            tracing::warn!("Text search not run: {}", e);
            ResultView::from_error(&e)
        }
    }
}

/// Runs a comparison check. An invalid folder yields an empty view with a warning.
pub fn run_compare_check(classifier: &ComparisonClassifier, request: &CompareRequest) -> ResultView {
    match classifier.run(request) {
        Ok(outcome) => compare_view(&outcome),
        Err(e) => {
            tracing::warn!("Comparison check not run: {}", e);
            ResultView::from_error(&e)
        }
    }
}

/// Opens the file behind a selected row, at its line when it has one.
pub fn open_row<L: EditorLauncher + ?Sized>(launcher: &L, row: &ResultRow) -> OpenOutcome {
    open_file_line(launcher, &row.path, row.line)
}

/// Stores `folder`, made absolute, as the last used directory and persists
/// the config.
///
/// Persisting is best effort; a failure is logged and the in-memory config is
/// still updated.
pub fn remember_directory(config: &mut AppConfig, folder: &Path, config_path: Option<&Path>) {
    let folder = std::path::absolute(folder).unwrap_or_else(|_| folder.to_path_buf());
    if config.last_directory.as_deref() == Some(folder.as_path()) {
        return;
    }
    config.last_directory = Some(folder);
    if let Err(e) = config::settings::save_config(config, config_path) {
        tracing::warn!("Failed to save config after changing directory: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CompareExtension, CoreResult, SearchExtension, StatusFilter};
    use crate::utils::test_helpers::{setup_test_logging, write_file};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct MockLauncher {
        opened: Mutex<Vec<(PathBuf, Option<usize>)>>,
    }

    impl EditorLauncher for MockLauncher {
        fn open_at(&self, path: &Path, line: Option<usize>) -> CoreResult<()> {
            self.opened.lock().unwrap().push((path.to_path_buf(), line));
            Ok(())
        }
    }

    #[test]
    fn test_search_on_invalid_folder_shows_warning() {
        setup_test_logging();
        let dir = tempdir().unwrap();
        let request = SearchRequest::new(dir.path().join("missing"), "error", SearchExtension::All);

        let view = run_text_search(&TextSearch::default(), &request);

        assert!(view.rows.is_empty());
        assert_eq!(view.warning.as_deref(), Some("Invalid folder"));
    }

    #[test]
    fn test_compare_on_invalid_folder_shows_warning() {
        let dir = tempdir().unwrap();
        let file = write_file(dir.path(), "r1.lst", "");
        let request = CompareRequest::new(&file, CompareExtension::All, StatusFilter::All);

        let view = run_compare_check(&ComparisonClassifier::default(), &request);

        assert!(view.rows.is_empty());
        assert!(view.warning.is_some());
    }

    #[test]
    fn test_selecting_a_search_row_opens_at_its_line() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "pgm/a.sas", "data x;\n  put 'ERROR: bad value';\nrun;");
        let request = SearchRequest::new(dir.path(), "error", SearchExtension::Sas);
        let view = run_text_search(&TextSearch::default(), &request);
        let launcher = MockLauncher::default();

        assert_eq!(open_row(&launcher, &view.rows[0]), OpenOutcome::Launched);

        let opened = launcher.opened.lock().unwrap();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].0.file_name(), path.file_name());
        assert_eq!(opened[0].1, Some(2));
    }

    #[test]
    fn test_selecting_a_comparison_row_opens_without_line() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "r2.lst",
            "Number of Observations with Some Compared Variables Unequal: 5",
        );
        let request = CompareRequest::new(dir.path(), CompareExtension::Lst, StatusFilter::All);
        let view = run_compare_check(&ComparisonClassifier::default(), &request);
        let launcher = MockLauncher::default();

        assert_eq!(view.rows.len(), 1);
        assert_eq!(open_row(&launcher, &view.rows[0]), OpenOutcome::Launched);
        assert_eq!(launcher.opened.lock().unwrap()[0].1, None);
    }

    #[test]
    fn test_remember_directory_persists_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        let mut config = AppConfig::default();

        remember_directory(&mut config, dir.path(), Some(&config_path));

        assert_eq!(config.last_directory.as_deref(), Some(dir.path()));
        let reloaded = config::settings::load_config(Some(&config_path)).unwrap();
        assert_eq!(reloaded.last_directory.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_remember_directory_stores_absolute_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        let mut config = AppConfig::default();

        remember_directory(&mut config, Path::new("study1/output"), Some(&config_path));

        let stored = config.last_directory.clone().unwrap();
        assert!(stored.is_absolute());
        assert!(stored.ends_with("study1/output"));
        let reloaded = config::settings::load_config(Some(&config_path)).unwrap();
        assert_eq!(reloaded.last_directory, Some(stored));
    }
}
