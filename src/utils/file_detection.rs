use std::path::Path;

/// Extensions the text search ever looks at, regardless of the selected filter.
pub const SEARCHABLE_EXTENSIONS: &[&str] = &[".sas", ".txt", ".log"];

/// Extensions handled by the paginated document extractor.
pub const PAGINATED_EXTENSIONS: &[&str] = &[".pdf"];

/// Returns the lowercase file name of `path`, or an empty string if it has none.
pub fn lowercase_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Checks whether the lowercase file name ends with one of `extensions`.
///
/// Extensions are given with their leading dot (`".sas"`). Matching is done on
/// the whole file name, so `"archive.tar.gz"` matches `".gz"` and `".tar.gz"`.
pub fn has_extension(path: &Path, extensions: &[impl AsRef<str>]) -> bool {
    let name = lowercase_file_name(path);
    extensions
        .iter()
        .any(|ext| name.ends_with(&ext.as_ref().to_lowercase()))
}
