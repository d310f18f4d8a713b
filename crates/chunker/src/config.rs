use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default window size, in characters (or tokens when a tokenizer is loaded).
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between consecutive windows.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Configuration for page chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Window length in splitter units; also the single-chunk threshold in chars
    pub size: usize,

    /// Units shared by two consecutive windows
    pub overlap: usize,

    /// `tokenizer.json` used for token-aware windows (character windows if unset)
    pub tokenizer_path: Option<PathBuf>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
            tokenizer_path: None,
        }
    }
}

impl ChunkerConfig {
    /// Create config with explicit size and overlap
    #[must_use]
    pub fn with_window(size: usize, overlap: usize) -> Self {
        Self {
            size,
            overlap,
            ..Default::default()
        }
    }

    /// Distance between the starts of two consecutive windows
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.size.saturating_sub(self.overlap)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.size == 0 {
            return Err("size must be > 0".to_string());
        }

        if self.overlap >= self.size {
            return Err(format!(
                "overlap ({}) must be smaller than size ({})",
                self.overlap, self.size
            ));
        }

        Ok(())
    }
}
