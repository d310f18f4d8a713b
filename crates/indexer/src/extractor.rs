use crate::error::{IndexerError, Result};
use lopdf::Document;
use std::path::Path;

/// Source of per-page text for a document
pub trait TextExtractor: Send + Sync {
    /// Text of every page in page order; unreadable pages are empty strings
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// Page text from a PDF file
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let document = Document::load(path).map_err(|e| IndexerError::DocumentError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let pages = document.get_pages();
        log::debug!("{} has {} pages", path.display(), pages.len());

        Ok(pages
            .keys()
            .map(|&page_number| {
                document.extract_text(&[page_number]).unwrap_or_else(|e| {
                    log::warn!("Page {page_number} of {}: {e}", path.display());
                    String::new()
                })
            })
            .collect())
    }
}
