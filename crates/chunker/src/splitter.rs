use crate::error::{ChunkerError, Result};
use std::path::Path;
use tokenizers::Tokenizer;

/// Splits text into overlapping windows of `size` units
///
/// Window `i` starts at `i * (size - overlap)` and spans at most `size` units.
/// Windows are trimmed and empty windows are dropped.
pub trait TextSplitter: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Split `text` into trimmed, non-empty windows
    fn split(&self, text: &str, size: usize, overlap: usize) -> Result<Vec<String>>;
}

/// `[start, end)` bounds of every window over `len` units
fn window_bounds(len: usize, size: usize, overlap: usize) -> Result<Vec<(usize, usize)>> {
    if size == 0 || overlap >= size {
        return Err(ChunkerError::invalid_config(format!(
            "window requires 0 <= overlap < size (size={size}, overlap={overlap})"
        )));
    }

    let stride = size - overlap;
    let mut bounds = Vec::with_capacity(len.div_ceil(stride));
    let mut start = 0;
    while start < len {
        bounds.push((start, (start + size).min(len)));
        start += stride;
    }
    Ok(bounds)
}

/// Character windows; the fallback when no tokenizer is available
#[derive(Debug, Clone, Copy, Default)]
pub struct CharSplitter;

impl TextSplitter for CharSplitter {
    fn name(&self) -> &'static str {
        "chars"
    }

    fn split(&self, text: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
        // Byte offset of every char boundary, plus the end of the text.
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = offsets.len() - 1;

        let windows = window_bounds(char_count, size, overlap)?
            .into_iter()
            .map(|(start, end)| text[offsets[start]..offsets[end]].trim())
            .filter(|window| !window.is_empty())
            .map(ToString::to_string)
            .collect();
        Ok(windows)
    }
}

/// Token windows using a Hugging Face `tokenizer.json`
pub struct TokenSplitter {
    tokenizer: Tokenizer,
}

impl TokenSplitter {
    #[must_use]
    pub const fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Load the tokenizer from a `tokenizer.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let tokenizer = Tokenizer::from_file(path).map_err(|e| {
            ChunkerError::tokenizer(format!("failed to load {}: {e}", path.display()))
        })?;
        Ok(Self::new(tokenizer))
    }
}

impl TextSplitter for TokenSplitter {
    fn name(&self) -> &'static str {
        "tokens"
    }

    fn split(&self, text: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| ChunkerError::tokenizer(format!("encode failed: {e}")))?;
        let ids = encoding.get_ids();

        let mut windows = Vec::new();
        for (start, end) in window_bounds(ids.len(), size, overlap)? {
            let decoded = self
                .tokenizer
                .decode(&ids[start..end], true)
                .map_err(|e| ChunkerError::tokenizer(format!("decode failed: {e}")))?;
            let trimmed = decoded.trim();
            if !trimmed.is_empty() {
                windows.push(trimmed.to_string());
            }
        }
        Ok(windows)
    }
}
