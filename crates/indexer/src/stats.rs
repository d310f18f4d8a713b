use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Statistics about a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Pages read from the document
    pub pages: usize,

    /// Pages that produced no text
    pub empty_pages: usize,

    /// Number of chunks created
    pub chunks: usize,

    /// Embedding dimension
    pub dimension: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Directory holding the index files
    pub index_dir: PathBuf,
}

impl BuildStats {
    pub fn add_page(&mut self, text: &str) {
        self.pages += 1;
        if text.trim().is_empty() {
            self.empty_pages += 1;
        }
    }
}
