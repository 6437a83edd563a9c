//! Recursive, extension-filtered directory enumeration.

use super::build_globset_from_patterns;
use super::error::{CoreError, CoreResult};
use super::ScanOptions;
use crate::utils::file_detection::has_extension;
use globset::GlobSet;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Which file name suffixes the walker lets through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionAllowList {
    /// Every regular file is yielded.
    All,
    /// Only files whose lowercase name ends with one of these (dotted) suffixes.
    Only(Vec<String>),
}

impl ExtensionAllowList {
    pub fn only<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(extensions.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, path: &Path) -> bool {
        match self {
            Self::All => true,
            Self::Only(extensions) => has_extension(path, extensions),
        }
    }
}

/// Walks a folder tree and yields the files that pass an extension allow-list.
///
/// The walker itself holds no traversal state; every call to [`DirectoryWalker::walk`]
/// starts a fresh traversal.
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    root: PathBuf,
    allow: ExtensionAllowList,
    ignore_set: GlobSet,
}

impl DirectoryWalker {
    pub fn new(root: impl Into<PathBuf>, allow: ExtensionAllowList) -> Self {
        Self {
            root: root.into(),
            allow,
            ignore_set: GlobSet::empty(),
        }
    }

    /// Prunes every entry matching one of the `.gitignore`-style `patterns`.
    pub fn with_ignore_patterns(mut self, options: &ScanOptions) -> Self {
        self.ignore_set = build_globset_from_patterns(&options.ignore_patterns);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Starts a lazy traversal.
    ///
    /// Fails with [`CoreError::InvalidFolder`] before touching anything if the
    /// root is not an existing directory. Yielded paths are absolute, and
    /// siblings come out in file-name order.
    pub fn walk(&self) -> CoreResult<FileWalk> {
        if !self.root.is_dir() {
            return Err(CoreError::InvalidFolder(self.root.clone()));
        }
        let root = std::path::absolute(&self.root)
            .map_err(|e| CoreError::Io(e, self.root.clone()))?;

        let ignore_set = self.ignore_set.clone();
        let pattern_root = root.clone();
        let mut builder = WalkBuilder::new(&root);
        builder
            .standard_filters(false) // hidden and VCS-ignored files are scanned too
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));
        if !ignore_set.is_empty() {
            // Patterns apply below the root only, never to the folders above it.
            builder.filter_entry(move |entry| {
                let relative = entry.path().strip_prefix(&pattern_root).unwrap_or(entry.path());
                !ignore_set.is_match(relative)
            });
        }

        Ok(FileWalk {
            inner: builder.build(),
            allow: self.allow.clone(),
        })
    }
}

/// Iterator returned by [`DirectoryWalker::walk`].
pub struct FileWalk {
    inner: ignore::Walk,
    allow: ExtensionAllowList,
}

impl Iterator for FileWalk {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        for entry in self.inner.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            if self.allow.allows(entry.path()) {
                return Some(entry.into_path());
            }
        }
        None
    }
}

/// Applies `scan` to every file and returns the per-file results in walk order.
///
/// With `parallel` set the files are collected first and processed on the
/// rayon pool; the collected order is preserved either way.
pub fn scan_files<T, F>(files: FileWalk, parallel: bool, scan: F) -> Vec<T>
where
    T: Send,
    F: Fn(&Path) -> Option<T> + Send + Sync,
{
    if parallel {
        let paths: Vec<PathBuf> = files.collect();
        paths
            .par_iter()
            .map(|path| scan(path))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    } else {
        files.filter_map(|path| scan(&path)).collect()
    }
}
