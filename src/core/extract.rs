//! Per-format text extraction, selected by file extension.

use super::error::{CoreError, CoreResult};
use super::FileHandler;
use crate::utils::file_detection::{has_extension, PAGINATED_EXTENSIONS};
use std::panic;
use std::path::Path;

/// Turns a file into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> CoreResult<String>;
}

/// Reads the file as text, dropping undecodable bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> CoreResult<String> {
        FileHandler::read_text_lossy(path)
    }
}

/// Extracts the text of every page of a PDF document.
///
/// A document that makes the parser panic is reported as an extraction error.
/// The process panic hook still runs first, so a panic message for that file
/// can appear on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Joins page texts in page order, one newline between pages.
    pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
        let mut text = String::new();
        for (idx, page) in pages.iter().enumerate() {
            if idx > 0 {
                text.push('\n');
            }
            text.push_str(page.as_ref());
        }
        text
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> CoreResult<String> {
        let extraction_error = |message: String| CoreError::Extraction {
            path: path.to_path_buf(),
            message,
        };

        // The parser panics on some malformed documents; treat that like any
        // other extraction failure.
        let pages = panic::catch_unwind(|| pdf_extract::extract_text_by_pages(path))
            .map_err(|_| {
                tracing::debug!("PDF parser panicked on {}", path.display());
                extraction_error("document parser panicked".to_string())
            })?
            .map_err(|e| extraction_error(e.to_string()))?;

        Ok(Self::join_pages(&pages))
    }
}

/// Maps file extensions to extractors, with a plain-text fallback.
pub struct ExtractorRegistry {
    by_extension: Vec<(String, Box<dyn TextExtractor>)>,
    fallback: Box<dyn TextExtractor>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        let mut registry = Self::plain_text_only();
        for ext in PAGINATED_EXTENSIONS {
            registry = registry.with_extractor(ext, PdfExtractor);
        }
        registry
    }
}

impl ExtractorRegistry {
    pub fn plain_text_only() -> Self {
        Self {
            by_extension: Vec::new(),
            fallback: Box::new(PlainTextExtractor),
        }
    }

    /// Registers `extractor` for `extension` (given with its dot).
    /// A later registration for the same extension wins.
    pub fn with_extractor(mut self, extension: &str, extractor: impl TextExtractor + 'static) -> Self {
        let extension = extension.to_lowercase();
        self.by_extension.retain(|(ext, _)| *ext != extension);
        self.by_extension.push((extension, Box::new(extractor)));
        self
    }

    pub fn for_path(&self, path: &Path) -> &dyn TextExtractor {
        self.by_extension
            .iter()
            .find(|(ext, _)| has_extension(path, &[ext]))
            .map(|(_, extractor)| &**extractor)
            .unwrap_or(&*self.fallback)
    }

    pub fn extract(&self, path: &Path) -> CoreResult<String> {
        self.for_path(path).extract(path)
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field(
                "extensions",
                &self.by_extension.iter().map(|(ext, _)| ext).collect::<Vec<_>>(),
            )
            .finish()
    }
}
