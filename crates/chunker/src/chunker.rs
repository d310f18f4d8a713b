use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::splitter::{CharSplitter, TextSplitter, TokenSplitter};
use crate::types::Chunk;

/// Main chunker interface for splitting page text
pub struct Chunker {
    config: ChunkerConfig,
    splitter: Box<dyn TextSplitter>,
}

impl std::fmt::Debug for Chunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunker")
            .field("config", &self.config)
            .field("splitter", &self.splitter.name())
            .finish()
    }
}

impl Chunker {
    /// Create a chunker, token-aware when `tokenizer_path` loads
    ///
    /// A tokenizer that fails to load falls back to character windows.
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        let splitter: Box<dyn TextSplitter> = match &config.tokenizer_path {
            Some(path) => match TokenSplitter::from_file(path) {
                Ok(splitter) => Box::new(splitter),
                Err(e) => {
                    log::warn!("Token-aware chunking unavailable, using character windows: {e}");
                    Box::new(CharSplitter)
                }
            },
            None => Box::new(CharSplitter),
        };
        Self::with_splitter(config, splitter)
    }

    /// Create a chunker with an explicit splitter
    pub fn with_splitter(config: ChunkerConfig, splitter: Box<dyn TextSplitter>) -> Result<Self> {
        config.validate().map_err(ChunkerError::invalid_config)?;
        log::debug!(
            "Chunker ready: size={} overlap={} splitter={}",
            config.size,
            config.overlap,
            splitter.name()
        );
        Ok(Self { config, splitter })
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Name of the active splitter (`chars` or `tokens`)
    #[must_use]
    pub fn splitter_name(&self) -> &'static str {
        self.splitter.name()
    }

    /// Chunk one page of text
    pub fn chunk_page(&self, text: &str, page_number: usize) -> Vec<Chunk> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        if text.chars().count() <= self.config.size {
            return vec![Chunk::whole_page(page_number, text.to_string())];
        }

        self.split(text, page_number)
            .into_iter()
            .enumerate()
            .map(|(index, window)| Chunk::window(page_number, index + 1, window))
            .collect()
    }

    /// Chunk consecutive pages, numbering them from 1
    pub fn chunk_pages<S: AsRef<str>>(&self, pages: &[S]) -> Vec<Chunk> {
        pages
            .iter()
            .enumerate()
            .flat_map(|(index, page)| self.chunk_page(page.as_ref(), index + 1))
            .collect()
    }

    fn split(&self, text: &str, page_number: usize) -> Vec<String> {
        let (size, overlap) = (self.config.size, self.config.overlap);
        match self.splitter.split(text, size, overlap) {
            Ok(windows) => windows,
            Err(e) => {
                log::warn!(
                    "{} splitter failed on page {page_number}, falling back to character windows: {e}",
                    self.splitter.name()
                );
                // Size and overlap were validated at construction.
                CharSplitter.split(text, size, overlap).unwrap_or_default()
            }
        }
    }
}
