use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Chunker error: {0}")]
    ChunkerError(#[from] pdfquery_chunker::ChunkerError),

    #[error("Vector store error: {0}")]
    VectorStoreError(#[from] pdfquery_vector_store::VectorStoreError),

    #[error("Index '{name}' not found in {}/", root.display())]
    NotFound { name: String, root: PathBuf },

    #[error("Invalid index name: {0}")]
    InvalidName(String),

    #[error("Cannot read document {}: {message}", path.display())]
    DocumentError { path: PathBuf, message: String },

    #[error("No text could be extracted from {}", .0.display())]
    EmptyDocument(PathBuf),

    #[error("Index is misaligned: {vectors} vectors but {records} metadata records")]
    Misaligned { vectors: usize, records: usize },

    #[error("Metadata record at position {position} has chunk_id {chunk_id}")]
    MisplacedRecord { position: usize, chunk_id: usize },
}
