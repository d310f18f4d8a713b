use crate::error::{Result, VectorStoreError};
use crate::openai::OpenAiBackend;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_STUB_DIMENSION: usize = 384;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    /// OpenAI-compatible `/embeddings` endpoint
    #[default]
    OpenAi,
    /// Deterministic hash-seeded vectors, no network
    Stub,
}

impl EmbeddingMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Stub => "stub",
        }
    }
}

impl Display for EmbeddingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingMode {
    type Err = VectorStoreError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "stub" => Ok(Self::Stub),
            other => Err(VectorStoreError::EmbeddingError(format!(
                "Unsupported embedding mode '{other}' (expected 'openai' or 'stub')"
            ))),
        }
    }
}

/// Settings for building an [`EmbeddingModel`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub mode: EmbeddingMode,

    /// Remote model name
    pub model: String,

    /// Maximum texts per request
    pub batch_size: usize,

    /// Base URL of the OpenAI-compatible API
    pub api_base: String,

    /// Bearer token; never serialized
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Vector length produced in stub mode
    pub stub_dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            mode: EmbeddingMode::default(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            stub_dimension: DEFAULT_STUB_DIMENSION,
        }
    }
}

/// A source of embedding vectors for one request's worth of texts
pub trait EmbeddingBackend: Send + Sync {
    /// Identifier of the model producing the vectors
    fn model_id(&self) -> &str;

    /// Embed every text, returning vectors in input order
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

#[derive(Clone, Debug)]
pub struct StubBackend {
    dimension: usize,
}

impl StubBackend {
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl EmbeddingBackend for StubBackend {
    fn model_id(&self) -> &str {
        "stub"
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| stub_embed(text, self.dimension))
            .collect())
    }
}

/// Batches texts over an [`EmbeddingBackend`]
pub struct EmbeddingModel {
    backend: Box<dyn EmbeddingBackend>,
    batch_size: usize,
}

impl EmbeddingModel {
    pub fn new(backend: Box<dyn EmbeddingBackend>, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(VectorStoreError::EmbeddingError(
                "batch_size must be > 0".to_string(),
            ));
        }
        Ok(Self {
            backend,
            batch_size,
        })
    }

    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let backend: Box<dyn EmbeddingBackend> = match config.mode {
            EmbeddingMode::OpenAi => Box::new(OpenAiBackend::new(
                &config.api_base,
                config.api_key.as_deref(),
                &config.model,
            )?),
            EmbeddingMode::Stub => Box::new(StubBackend::new(config.stub_dimension)),
        };
        log::debug!(
            "Embedding model '{}' ({} mode, batch size {})",
            backend.model_id(),
            config.mode,
            config.batch_size
        );
        Self::new(backend, config.batch_size)
    }

    #[must_use]
    pub fn model_id(&self) -> &str {
        self.backend.model_id()
    }

    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()])?;
        embeddings
            .pop()
            .ok_or_else(|| VectorStoreError::EmbeddingError("Empty embedding result".to_string()))
    }

    /// Embed `texts` one request per `batch_size` slice, preserving order
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for (batch_index, batch) in texts.chunks(self.batch_size).enumerate() {
            log::debug!(
                "Embedding batch {} ({} texts) with '{}'",
                batch_index + 1,
                batch.len(),
                self.backend.model_id()
            );
            let vectors = self.backend.embed_batch(batch)?;
            if vectors.len() != batch.len() {
                return Err(VectorStoreError::EmbeddingError(format!(
                    "backend returned {} vectors for {} texts",
                    vectors.len(),
                    batch.len()
                )));
            }
            embeddings.extend(vectors);
        }
        Ok(embeddings)
    }
}

/// Scale `vec` to unit L2 norm; zero vectors are left unchanged
pub fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

fn stub_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut state =
        fnv1a_64(text.as_bytes()) ^ (dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut vec = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let bits = splitmix64(&mut state);
        let mantissa = ((bits >> 32) as u32) >> 9;
        let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
        vec.push(unit.mul_add(2.0, -1.0));
    }
    normalize(&mut vec);
    vec
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
