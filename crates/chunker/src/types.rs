use serde::{Deserialize, Serialize};
use std::fmt;

/// A bounded span of page text, the unit of embedding and retrieval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Source page (1-indexed)
    pub page_number: usize,

    /// Position within the page (1-indexed), `None` when the page is a single chunk
    pub sequence_in_page: Option<usize>,

    /// Trimmed window text, without the label prefix
    pub text: String,
}

impl Chunk {
    /// Chunk holding a whole page
    #[must_use]
    pub const fn whole_page(page_number: usize, text: String) -> Self {
        Self {
            page_number,
            sequence_in_page: None,
            text,
        }
    }

    /// Chunk holding the `sequence`-th window of a page
    #[must_use]
    pub const fn window(page_number: usize, sequence: usize, text: String) -> Self {
        Self {
            page_number,
            sequence_in_page: Some(sequence),
            text,
        }
    }

    /// Provenance label, e.g. `Page 3` or `Page 3 – chunk 2`
    #[must_use]
    pub fn label(&self) -> String {
        match self.sequence_in_page {
            Some(sequence) => format!("Page {} – chunk {sequence}", self.page_number),
            None => format!("Page {}", self.page_number),
        }
    }

    /// Text as embedded and stored: `"<label>:\n<text>"`
    #[must_use]
    pub fn labeled_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\n{}", self.label(), self.text)
    }
}
