//! # pdfquery Indexer
//!
//! Builds and queries named retrieval indices over a PDF document.
//!
//! ## Pipeline
//!
//! ```text
//! PDF
//!     │
//!     ├──> TextExtractor (one string per page)
//!     │      └─> Page text
//!     │
//!     ├──> Chunker (page-scoped windows)
//!     │      └─> Labeled chunks
//!     │
//!     ├──> EmbeddingModel (batched)
//!     │      └─> FlatIndex → <root>/<name>/vectors.index
//!     │
//!     └──> MetadataStore → <root>/<name>/metadata.jsonl
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pdfquery_chunker::{Chunker, ChunkerConfig};
//! use pdfquery_indexer::IndexManager;
//! use pdfquery_vector_store::{EmbeddingConfig, EmbeddingModel};
//! use std::path::Path;
//!
//! # fn main() -> pdfquery_indexer::Result<()> {
//! let chunker = Chunker::new(ChunkerConfig::default())?;
//! let embedder = EmbeddingModel::from_config(&EmbeddingConfig::default())?;
//! let manager = IndexManager::new("vector", chunker, embedder);
//!
//! let stats = manager.build_index(Path::new("aws.pdf"), "aws")?;
//! println!("Indexed {} pages, {} chunks", stats.pages, stats.chunks);
//!
//! for text in manager.query_index("aws", "What are the pillars?", 5)? {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod extractor;
mod manager;
mod paths;
mod stats;

pub use error::{IndexerError, Result};
pub use extractor::{PdfExtractor, TextExtractor};
pub use manager::{IndexManager, LoadedIndex, RetrievedChunk};
pub use paths::{
    validate_index_name, IndexPaths, DEFAULT_STORAGE_DIR, METADATA_FILE_NAME,
    VECTOR_INDEX_FILE_NAME,
};
pub use stats::BuildStats;
