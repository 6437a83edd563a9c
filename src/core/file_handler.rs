//! Tolerant text reading shared by the search and the classifier.

use super::error::{CoreError, CoreResult};
use std::fs;
use std::path::Path;

pub struct FileHandler;

impl FileHandler {
    /// Reads the whole file as text.
    ///
    /// Invalid UTF-8 sequences are dropped rather than replaced, so a few stray
    /// bytes from a legacy encoding never fail the file.
    pub fn read_text_lossy(file_path: &Path) -> CoreResult<String> {
        let bytes = fs::read(file_path).map_err(|e| CoreError::Io(e, file_path.to_path_buf()))?;
        Ok(Self::decode_lossy(&bytes))
    }

    /// Decodes `bytes` as UTF-8, skipping every undecodable byte sequence.
    pub fn decode_lossy(bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                let mut text = String::with_capacity(bytes.len());
                for chunk in bytes.utf8_chunks() {
                    text.push_str(chunk.valid());
                }
                text
            }
        }
    }
}
