use pdfquery_chunker::{Chunker, ChunkerConfig};
use pdfquery_indexer::{IndexManager, IndexerError, TextExtractor};
use pdfquery_vector_store::{
    EmbeddingBackend, EmbeddingModel, StubBackend, VectorStoreError,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

const PAGES: [&str; 3] = [
    "Security is top priority...",
    "Reliability keeps workloads running.",
    "Cost optimization reduces wastage.",
];

struct FakeExtractor(Vec<String>);

impl FakeExtractor {
    fn boxed(pages: &[&str]) -> Box<dyn TextExtractor> {
        Box::new(Self(pages.iter().map(|p| (*p).to_string()).collect()))
    }
}

impl TextExtractor for FakeExtractor {
    fn extract_pages(&self, _path: &Path) -> pdfquery_indexer::Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// One dimension per topic word plus a constant bias
struct KeywordBackend {
    calls: Arc<AtomicUsize>,
}

impl EmbeddingBackend for KeywordBackend {
    fn model_id(&self) -> &str {
        "keywords"
    }

    fn embed_batch(&self, texts: &[String]) -> pdfquery_vector_store::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| {
                let text = text.to_lowercase();
                let mut vector: Vec<f32> = ["security", "reliability", "cost"]
                    .iter()
                    .map(|word| text.matches(word).count() as f32)
                    .collect();
                vector.push(0.1);
                vector
            })
            .collect())
    }
}

/// Rejects every request the way a rate-limited service does
struct QuotaBackend {
    calls: Arc<AtomicUsize>,
}

impl EmbeddingBackend for QuotaBackend {
    fn model_id(&self) -> &str {
        "quota"
    }

    fn embed_batch(&self, _texts: &[String]) -> pdfquery_vector_store::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(VectorStoreError::ServiceError {
            status: 429,
            body: "quota".to_string(),
        })
    }
}

fn quota_manager(root: &Path, pages: &[&str]) -> (IndexManager, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = QuotaBackend {
        calls: Arc::clone(&calls),
    };
    let manager = IndexManager::with_extractor(
        root,
        Chunker::new(ChunkerConfig::default()).unwrap(),
        EmbeddingModel::new(Box::new(backend), 1000).unwrap(),
        FakeExtractor::boxed(pages),
    );
    (manager, calls)
}

fn keyword_manager(root: &Path, pages: &[&str]) -> (IndexManager, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = KeywordBackend {
        calls: Arc::clone(&calls),
    };
    let manager = IndexManager::with_extractor(
        root,
        Chunker::new(ChunkerConfig::default()).unwrap(),
        EmbeddingModel::new(Box::new(backend), 1000).unwrap(),
        FakeExtractor::boxed(pages),
    );
    (manager, calls)
}

fn stub_manager(root: &Path, pages: &[&str], size: usize, overlap: usize) -> IndexManager {
    IndexManager::with_extractor(
        root,
        Chunker::new(ChunkerConfig::with_window(size, overlap)).unwrap(),
        EmbeddingModel::new(Box::new(StubBackend::new(32)), 1000).unwrap(),
        FakeExtractor::boxed(pages),
    )
}

#[test]
fn three_pages_return_every_chunk() {
    let temp = TempDir::new().unwrap();
    let (manager, calls) = keyword_manager(temp.path(), &PAGES);

    let stats = manager
        .build_index(Path::new("aws.pdf"), "aws")
        .expect("build");
    assert_eq!(stats.pages, 3);
    assert_eq!(stats.chunks, 3);
    assert_eq!(stats.dimension, 4);
    assert_eq!(stats.index_dir, temp.path().join("aws"));
    assert_eq!(calls.load(Ordering::SeqCst), 1, "all chunks in one call");

    let results = manager
        .query_index("aws", "What is the top priority for security?", 3)
        .expect("query");
    assert_eq!(results.len(), 3);
    assert!(results.iter().any(|text| text.contains("Security")));
    assert_eq!(results[0], "Page 1:\nSecurity is top priority...");
}

#[test]
fn search_reports_provenance() {
    let temp = TempDir::new().unwrap();
    let (manager, _) = keyword_manager(temp.path(), &PAGES);
    manager.build_index(Path::new("aws.pdf"), "aws").unwrap();

    let hits = manager
        .search_index("aws", "How do I cut cost?", 1)
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].chunk_id, 2);
    assert_eq!(hits[0].page, "Page 3");
    assert_eq!(hits[0].text, "Page 3:\nCost optimization reduces wastage.");
    assert!(hits[0].score > 0.9);
}

#[test]
fn top_k_beyond_chunk_count_returns_available() {
    let temp = TempDir::new().unwrap();
    let (manager, _) = keyword_manager(temp.path(), &PAGES);
    manager.build_index(Path::new("aws.pdf"), "aws").unwrap();

    let results = manager.query_index("aws", "reliability", 10).unwrap();
    assert_eq!(results.len(), 3);
}

#[test]
fn query_with_top_k_n_returns_each_chunk_once() {
    let temp = TempDir::new().unwrap();
    let long_page: String = (0..60).map(|i| format!("word{i} ")).collect();
    let manager = stub_manager(temp.path(), &[long_page.as_str(), "short page", ""], 100, 20);
    let stats = manager.build_index(Path::new("doc.pdf"), "doc").unwrap();
    assert!(stats.chunks > 3);
    assert_eq!(stats.empty_pages, 1);

    let loaded = manager.load_index("doc").unwrap();
    assert_eq!(loaded.index.len(), stats.chunks);

    let mut results = manager
        .query_index("doc", "word42", stats.chunks)
        .unwrap();
    let mut expected = loaded.metadata.texts();
    results.sort();
    expected.sort();
    assert_eq!(results, expected);
}

#[test]
fn load_unknown_name_is_not_found() {
    let temp = TempDir::new().unwrap();
    let (manager, _) = keyword_manager(temp.path(), &PAGES);

    let err = manager.load_index("never-built").unwrap_err();
    assert!(matches!(err, IndexerError::NotFound { ref name, .. } if name == "never-built"));

    std::fs::create_dir_all(temp.path().join("partial")).unwrap();
    std::fs::write(temp.path().join("partial").join("metadata.jsonl"), "").unwrap();
    assert!(matches!(
        manager.query_index("partial", "security", 3),
        Err(IndexerError::NotFound { .. })
    ));
}

#[test]
fn extra_metadata_line_is_misaligned() {
    let temp = TempDir::new().unwrap();
    let (manager, _) = keyword_manager(temp.path(), &PAGES);
    manager.build_index(Path::new("aws.pdf"), "aws").unwrap();

    let metadata = temp.path().join("aws").join("metadata.jsonl");
    let mut raw = std::fs::read_to_string(&metadata).unwrap();
    raw.push_str("{\"page\":\"Page 4\",\"chunk_id\":3,\"text\":\"Page 4:\\nextra\"}\n");
    std::fs::write(&metadata, raw).unwrap();

    assert!(matches!(
        manager.load_index("aws"),
        Err(IndexerError::Misaligned {
            vectors: 3,
            records: 4
        })
    ));
}

#[test]
fn reordered_metadata_is_rejected() {
    let temp = TempDir::new().unwrap();
    let (manager, _) = keyword_manager(temp.path(), &PAGES);
    manager.build_index(Path::new("aws.pdf"), "aws").unwrap();

    let metadata = temp.path().join("aws").join("metadata.jsonl");
    let raw = std::fs::read_to_string(&metadata).unwrap();
    let mut lines: Vec<&str> = raw.lines().collect();
    lines.swap(0, 1);
    std::fs::write(&metadata, lines.join("\n")).unwrap();

    assert!(matches!(
        manager.load_index("aws"),
        Err(IndexerError::MisplacedRecord {
            position: 0,
            chunk_id: 1
        })
    ));
}

#[test]
fn invalid_names_are_rejected() {
    let temp = TempDir::new().unwrap();
    let (manager, _) = keyword_manager(temp.path(), &PAGES);

    for name in ["", "..", "../outside", "a/b"] {
        assert!(matches!(
            manager.build_index(Path::new("aws.pdf"), name),
            Err(IndexerError::InvalidName(_))
        ));
    }
    assert!(std::fs::read_dir(temp.path()).unwrap().next().is_none());
}

#[test]
fn empty_document_leaves_existing_index_untouched() {
    let temp = TempDir::new().unwrap();
    let (manager, _) = keyword_manager(temp.path(), &PAGES);
    manager.build_index(Path::new("aws.pdf"), "aws").unwrap();

    let (blank, calls) = keyword_manager(temp.path(), &["", "   \n  "]);
    let err = blank.build_index(Path::new("blank.pdf"), "aws").unwrap_err();
    assert!(matches!(err, IndexerError::EmptyDocument(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(manager.load_index("aws").unwrap().metadata.len(), 3);
}

#[test]
fn rebuild_replaces_previous_index() {
    let temp = TempDir::new().unwrap();
    let (manager, _) = keyword_manager(temp.path(), &PAGES);
    manager.build_index(Path::new("aws.pdf"), "aws").unwrap();

    let (smaller, _) = keyword_manager(temp.path(), &["Cost only."]);
    smaller.build_index(Path::new("cost.pdf"), "aws").unwrap();

    let loaded = manager.load_index("aws").unwrap();
    assert_eq!(loaded.metadata.len(), 1);
    assert_eq!(loaded.metadata.get(0).unwrap().page, "Page 1");
    assert_eq!(
        manager.query_index("aws", "security", 5).unwrap(),
        vec!["Page 1:\nCost only.".to_string()]
    );
}

#[test]
fn embedding_failure_propagates_and_keeps_previous_index() {
    let temp = TempDir::new().unwrap();
    let (manager, _) = keyword_manager(temp.path(), &PAGES);
    manager.build_index(Path::new("aws.pdf"), "aws").unwrap();
    let before = std::fs::read(temp.path().join("aws").join("vectors.index")).unwrap();

    let (failing, calls) = quota_manager(temp.path(), &PAGES[..2]);
    let err = failing.build_index(Path::new("aws.pdf"), "aws").unwrap_err();
    assert!(matches!(
        err,
        IndexerError::VectorStoreError(VectorStoreError::ServiceError { status: 429, .. })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 1, "no retry");

    let err = failing.query_index("aws", "security", 3).unwrap_err();
    assert!(matches!(
        err,
        IndexerError::VectorStoreError(VectorStoreError::ServiceError { status: 429, .. })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let loaded = manager.load_index("aws").unwrap();
    assert_eq!(loaded.metadata.len(), 3);
    assert_eq!(
        std::fs::read(temp.path().join("aws").join("vectors.index")).unwrap(),
        before
    );
}
