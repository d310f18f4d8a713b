use crate::error::{IndexerError, Result};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_STORAGE_DIR: &str = "vector";
pub const VECTOR_INDEX_FILE_NAME: &str = "vectors.index";
pub const METADATA_FILE_NAME: &str = "metadata.jsonl";

/// Index names become directory names; only a single plain component is allowed
pub fn validate_index_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
        _ => Err(IndexerError::InvalidName(format!(
            "'{name}' must be a single directory name (no separators, '.' or '..')"
        ))),
    }
}

/// On-disk location of one named index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPaths {
    pub dir: PathBuf,
    pub vectors: PathBuf,
    pub metadata: PathBuf,
}

impl IndexPaths {
    pub fn new(root: &Path, name: &str) -> Result<Self> {
        validate_index_name(name)?;
        let dir = root.join(name);
        Ok(Self {
            vectors: dir.join(VECTOR_INDEX_FILE_NAME),
            metadata: dir.join(METADATA_FILE_NAME),
            dir,
        })
    }

    /// Both artifacts are present
    #[must_use]
    pub fn exists(&self) -> bool {
        self.vectors.is_file() && self.metadata.is_file()
    }

    /// Remove any previous index with this name and create an empty directory
    pub(crate) fn recreate_dir(&self) -> Result<()> {
        if self.dir.exists() {
            log::debug!("Removing previous index at {}", self.dir.display());
            std::fs::remove_dir_all(&self.dir)?;
        }
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }
}
