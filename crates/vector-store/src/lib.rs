//! # pdfquery Vector Store
//!
//! Embedding generation and exhaustive similarity search for page chunks.
//!
//! ## Features
//!
//! - **Batched embeddings** over an OpenAI-compatible API, or a deterministic stub
//! - **Flat inner-product index** over L2-normalized vectors (cosine similarity)
//! - **Single-file persistence** for the index, JSON lines for chunk metadata
//!
//! ## Architecture
//!
//! ```text
//! Chunk[]
//!     │
//!     ├──> EmbeddingModel (batched backend calls)
//!     │      └─> Vector[dim]
//!     │
//!     ├──> FlatIndex (normalize → matrix)
//!     │      └─> Exhaustive top-k search
//!     │
//!     └──> MetadataStore
//!            └─> metadata.jsonl, one record per vector position
//! ```
//!
//! ## Example
//!
//! ```
//! use pdfquery_vector_store::{EmbeddingModel, FlatIndex, StubBackend};
//!
//! # fn main() -> pdfquery_vector_store::Result<()> {
//! let model = EmbeddingModel::new(Box::new(StubBackend::new(8)), 16)?;
//! let texts = vec!["security".to_string(), "reliability".to_string()];
//! let index = FlatIndex::build(model.embed_batch(&texts)?)?;
//!
//! let hits = index.search(&model.embed("security")?, 1)?;
//! assert_eq!(hits[0].position, 0);
//! # Ok(())
//! # }
//! ```

mod embeddings;
mod error;
mod flat_index;
mod metadata;
mod openai;
mod types;

pub use embeddings::{
    normalize, EmbeddingBackend, EmbeddingConfig, EmbeddingMode, EmbeddingModel, StubBackend,
    DEFAULT_API_BASE, DEFAULT_BATCH_SIZE, DEFAULT_EMBEDDING_MODEL, DEFAULT_STUB_DIMENSION,
};
pub use error::{Result, VectorStoreError};
pub use flat_index::{FlatIndex, FLAT_INDEX_FORMAT, FLAT_INDEX_VERSION};
pub use metadata::{ChunkRecord, MetadataStore};
pub use openai::OpenAiBackend;
pub use types::Neighbor;
