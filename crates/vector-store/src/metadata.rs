use crate::error::{Result, VectorStoreError};
use pdfquery_chunker::Chunk;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One line of `metadata.jsonl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Provenance label, e.g. `Page 2 – chunk 1`
    pub page: String,

    /// Position of the matching vector in the index
    pub chunk_id: usize,

    /// Labeled chunk text
    pub text: String,
}

impl ChunkRecord {
    #[must_use]
    pub fn from_chunk(chunk_id: usize, chunk: &Chunk) -> Self {
        Self {
            page: chunk.label(),
            chunk_id,
            text: chunk.labeled_text(),
        }
    }
}

/// Chunk records ordered by vector position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataStore {
    records: Vec<ChunkRecord>,
}

impl MetadataStore {
    #[must_use]
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        Self {
            records: chunks
                .iter()
                .enumerate()
                .map(|(chunk_id, chunk)| ChunkRecord::from_chunk(chunk_id, chunk))
                .collect(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[ChunkRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&ChunkRecord> {
        self.records.get(position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Texts of every record, in position order
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.records.iter().map(|r| r.text.clone()).collect()
    }

    /// First record whose `chunk_id` differs from its line position
    #[must_use]
    pub fn first_misplaced(&self) -> Option<(usize, &ChunkRecord)> {
        self.records
            .iter()
            .enumerate()
            .find(|(position, record)| record.chunk_id != *position)
    }

    /// Write one JSON object per line, in position order
    pub fn write_jsonl(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        for record in &self.records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a file written by [`MetadataStore::write_jsonl`]; blank lines are skipped
    pub fn read_jsonl(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| {
                VectorStoreError::InvalidMetadata {
                    line: index + 1,
                    message: e.to_string(),
                }
            })?;
            records.push(record);
        }
        Ok(Self { records })
    }
}
