use crate::embeddings::normalize;
use crate::error::{Result, VectorStoreError};
use crate::types::Neighbor;
use bincode::Options;
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub const FLAT_INDEX_FORMAT: &str = "pdfquery-flat-ip";
pub const FLAT_INDEX_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct PersistedFlatIndex {
    format: String,
    version: u32,
    dimension: usize,
    count: usize,
    data: Vec<f32>,
}

/// Exhaustive inner-product index over L2-normalized vectors
///
/// Row `i` of the matrix is the vector inserted at position `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    vectors: Array2<f32>,
}

impl FlatIndex {
    /// Build an index from `vectors`, normalizing each one
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = vectors
            .first()
            .map(Vec::len)
            .ok_or_else(|| VectorStoreError::IndexError("no vectors to index".to_string()))?;
        if dimension == 0 {
            return Err(VectorStoreError::IndexError(
                "vectors must have at least one dimension".to_string(),
            ));
        }

        let count = vectors.len();
        let mut data = Vec::with_capacity(count * dimension);
        for mut vector in vectors {
            if vector.len() != dimension {
                return Err(VectorStoreError::InvalidDimension {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            normalize(&mut vector);
            data.extend(vector);
        }

        let vectors = Array2::from_shape_vec((count, dimension), data)
            .map_err(|e| VectorStoreError::IndexError(e.to_string()))?;
        Ok(Self { vectors })
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `k` nearest vectors by descending score, ties by ascending position
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension() {
            return Err(VectorStoreError::InvalidDimension {
                expected: self.dimension(),
                actual: query.len(),
            });
        }

        let mut query = query.to_vec();
        normalize(&mut query);
        let scores = self.vectors.dot(&ArrayView1::from(query.as_slice()));

        let mut neighbors: Vec<Neighbor> = scores
            .iter()
            .enumerate()
            .map(|(position, &score)| Neighbor { position, score })
            .collect();
        neighbors.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.position.cmp(&b.position))
        });
        neighbors.truncate(k);

        Ok(neighbors)
    }

    /// Write the index to a single binary file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let persisted = PersistedFlatIndex {
            format: FLAT_INDEX_FORMAT.to_string(),
            version: FLAT_INDEX_VERSION,
            dimension: self.dimension(),
            count: self.len(),
            data: self.vectors.iter().copied().collect(),
        };

        let mut writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(&mut writer, &persisted)?;
        writer.flush()?;
        log::debug!(
            "Saved flat index ({} x {}) to {}",
            self.len(),
            self.dimension(),
            path.display()
        );
        Ok(())
    }

    /// Read an index written by [`FlatIndex::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        // A persisted index never decodes to more bytes than the file holds.
        let limit = file.metadata()?.len();
        let persisted: PersistedFlatIndex = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(limit)
            .deserialize_from(BufReader::new(file))?;

        if persisted.format != FLAT_INDEX_FORMAT {
            return Err(VectorStoreError::IndexError(format!(
                "{} is not a flat index (format '{}')",
                path.display(),
                persisted.format
            )));
        }
        if persisted.version != FLAT_INDEX_VERSION {
            return Err(VectorStoreError::IndexError(format!(
                "Unsupported flat index version {} (expected {FLAT_INDEX_VERSION})",
                persisted.version
            )));
        }

        let vectors =
            Array2::from_shape_vec((persisted.count, persisted.dimension), persisted.data)
                .map_err(|e| {
                    VectorStoreError::IndexError(format!("{}: {e}", path.display()))
                })?;
        log::debug!(
            "Loaded flat index ({} x {}) from {}",
            vectors.len_of(Axis(0)),
            vectors.len_of(Axis(1)),
            path.display()
        );
        Ok(Self { vectors })
    }
}
