//! # pdfquery Chunker
//!
//! Splits extracted page text into overlapping, page-labelled chunks ready for
//! embedding.
//!
//! ## Pipeline
//!
//! ```text
//! Page text
//!     │
//!     ├──> Trim (empty page → no chunks)
//!     │
//!     ├──> Fits in `size` chars? → single chunk "Page N"
//!     │
//!     └──> Splitter (token-aware or character windows)
//!          ├─> Window i starts at i * (size - overlap)
//!          ├─> Trim each window, drop empty ones
//!          └─> Chunks "Page N – chunk i"
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pdfquery_chunker::{Chunker, ChunkerConfig};
//!
//! let config = ChunkerConfig { size: 10, overlap: 2, ..Default::default() };
//! let chunker = Chunker::new(config).unwrap();
//!
//! let chunks = chunker.chunk_page("Security is top priority.", 1);
//! assert_eq!(chunks.len(), 4);
//! assert_eq!(chunks[0].label(), "Page 1 – chunk 1");
//! ```

mod chunker;
mod config;
mod error;
mod splitter;
mod types;

pub use chunker::Chunker;
pub use config::{ChunkerConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use error::{ChunkerError, Result};
pub use splitter::{CharSplitter, TextSplitter, TokenSplitter};
pub use types::Chunk;
