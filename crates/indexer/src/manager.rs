use crate::error::{IndexerError, Result};
use crate::extractor::{PdfExtractor, TextExtractor};
use crate::paths::IndexPaths;
use crate::stats::BuildStats;
use pdfquery_chunker::Chunker;
use pdfquery_vector_store::{EmbeddingModel, FlatIndex, MetadataStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A persisted index read back into memory
#[derive(Debug, Clone)]
pub struct LoadedIndex {
    pub index: FlatIndex,
    pub metadata: MetadataStore,
}

/// One retrieved chunk with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk_id: usize,
    pub page: String,
    pub text: String,
    pub score: f32,
}

/// Builds, loads and queries named indices under a storage root
pub struct IndexManager {
    root: PathBuf,
    chunker: Chunker,
    embedder: EmbeddingModel,
    extractor: Box<dyn TextExtractor>,
}

impl IndexManager {
    /// Manager reading PDFs with [`PdfExtractor`]
    pub fn new(root: impl Into<PathBuf>, chunker: Chunker, embedder: EmbeddingModel) -> Self {
        Self::with_extractor(root, chunker, embedder, Box::new(PdfExtractor))
    }

    pub fn with_extractor(
        root: impl Into<PathBuf>,
        chunker: Chunker,
        embedder: EmbeddingModel,
        extractor: Box<dyn TextExtractor>,
    ) -> Self {
        Self {
            root: root.into(),
            chunker,
            embedder,
            extractor,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn paths(&self, name: &str) -> Result<IndexPaths> {
        IndexPaths::new(&self.root, name)
    }

    /// Extract, chunk, embed and persist `source` as index `name`
    ///
    /// An existing index with the same name is replaced. Nothing on disk
    /// changes unless the document yields at least one chunk and every
    /// embedding succeeds.
    pub fn build_index(&self, source: &Path, name: &str) -> Result<BuildStats> {
        let paths = self.paths(name)?;
        let start = Instant::now();
        let mut stats = BuildStats::default();

        log::info!("Reading {}...", source.display());
        let pages = self.extractor.extract_pages(source)?;
        for page in &pages {
            stats.add_page(page);
        }

        let chunks = self.chunker.chunk_pages(&pages);
        log::debug!(
            "{} pages split into {} chunks ({} splitter)",
            pages.len(),
            chunks.len(),
            self.chunker.splitter_name()
        );
        if chunks.is_empty() {
            return Err(IndexerError::EmptyDocument(source.to_path_buf()));
        }
        stats.chunks = chunks.len();

        let metadata = MetadataStore::from_chunks(&chunks);
        log::info!("Generating embeddings for {} chunks...", chunks.len());
        log::debug!(
            "Embedding with '{}' in batches of {}",
            self.embedder.model_id(),
            self.embedder.batch_size()
        );
        let vectors = self.embedder.embed_batch(&metadata.texts())?;
        let index = FlatIndex::build(vectors)?;
        stats.dimension = index.dimension();

        paths.recreate_dir()?;
        index.save(&paths.vectors)?;
        metadata.write_jsonl(&paths.metadata)?;

        stats.index_dir = paths.dir;
        stats.time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!(
            "Index stored in {}/ ({} pages, {} chunks, dim {})",
            stats.index_dir.display(),
            stats.pages,
            stats.chunks,
            stats.dimension
        );
        if stats.empty_pages > 0 {
            log::warn!("{} pages had no extractable text", stats.empty_pages);
        }
        Ok(stats)
    }

    /// Read index `name` and check that vectors and records line up
    pub fn load_index(&self, name: &str) -> Result<LoadedIndex> {
        let paths = self.paths(name)?;
        if !paths.exists() {
            return Err(IndexerError::NotFound {
                name: name.to_string(),
                root: self.root.clone(),
            });
        }

        let index = FlatIndex::load(&paths.vectors)?;
        let metadata = MetadataStore::read_jsonl(&paths.metadata)?;

        if index.len() != metadata.len() {
            return Err(IndexerError::Misaligned {
                vectors: index.len(),
                records: metadata.len(),
            });
        }
        if let Some((position, record)) = metadata.first_misplaced() {
            return Err(IndexerError::MisplacedRecord {
                position,
                chunk_id: record.chunk_id,
            });
        }

        log::debug!("Loaded index '{name}' with {} chunks", index.len());
        Ok(LoadedIndex { index, metadata })
    }

    /// Up to `top_k` chunks most similar to `question`, best first
    pub fn search_index(
        &self,
        name: &str,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>> {
        let loaded = self.load_index(name)?;
        let query = self.embedder.embed(question)?;
        let neighbors = loaded.index.search(&query, top_k)?;

        Ok(neighbors
            .into_iter()
            .filter_map(|neighbor| {
                loaded
                    .metadata
                    .get(neighbor.position)
                    .map(|record| RetrievedChunk {
                        chunk_id: record.chunk_id,
                        page: record.page.clone(),
                        text: record.text.clone(),
                        score: neighbor.score,
                    })
            })
            .collect())
    }

    /// Texts of the `top_k` chunks most similar to `question`, best first
    pub fn query_index(&self, name: &str, question: &str, top_k: usize) -> Result<Vec<String>> {
        Ok(self
            .search_index(name, question, top_k)?
            .into_iter()
            .map(|chunk| chunk.text)
            .collect())
    }
}

impl std::fmt::Debug for IndexManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexManager")
            .field("root", &self.root)
            .field("chunker", &self.chunker)
            .field("embedder", &self.embedder.model_id())
            .finish_non_exhaustive()
    }
}
