use anyhow::{Context, Result};
use pdfquery_chunker::ChunkerConfig;
use pdfquery_indexer::DEFAULT_STORAGE_DIR;
use pdfquery_vector_store::{EmbeddingConfig, EmbeddingMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::answer::DEFAULT_CHAT_MODEL;

/// Looked up in the working directory when `--config` is not given
pub const CONFIG_FILE_NAME: &str = "pdfquery.toml";

pub const ENV_STORAGE_DIR: &str = "PDFQUERY_STORAGE_DIR";
pub const ENV_EMBEDDING_MODE: &str = "PDFQUERY_EMBEDDING_MODE";
pub const ENV_EMBEDDING_MODEL: &str = "PDFQUERY_EMBEDDING_MODEL";
pub const ENV_API_BASE: &str = "PDFQUERY_API_BASE";
pub const ENV_TOKENIZER: &str = "PDFQUERY_TOKENIZER";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Chat-completions model used to answer questions
    pub model: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}

/// Settings for one `pdfquery` invocation
///
/// Precedence, lowest first: defaults, TOML file, environment, command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfQueryConfig {
    /// Root directory holding one subdirectory per index
    pub storage_dir: PathBuf,
    pub chunking: ChunkerConfig,
    pub embedding: EmbeddingConfig,
    pub chat: ChatConfig,
}

impl Default for PdfQueryConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            chunking: ChunkerConfig::default(),
            embedding: EmbeddingConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl PdfQueryConfig {
    /// Resolve configuration from `explicit` (or `pdfquery.toml`) and the process environment
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILE_NAME).is_file() => {
                Self::from_file(Path::new(CONFIG_FILE_NAME))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply environment overrides; empty values are ignored
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dir) = var(ENV_STORAGE_DIR) {
            self.storage_dir = PathBuf::from(dir);
        }
        if let Some(mode) = var(ENV_EMBEDDING_MODE) {
            self.embedding.mode = mode
                .parse::<EmbeddingMode>()
                .with_context(|| format!("Invalid {ENV_EMBEDDING_MODE}"))?;
        }
        if let Some(model) = var(ENV_EMBEDDING_MODEL) {
            self.embedding.model = model;
        }
        if let Some(base) = var(ENV_API_BASE) {
            self.embedding.api_base = base;
        }
        if let Some(tokenizer) = var(ENV_TOKENIZER) {
            self.chunking.tokenizer_path = Some(PathBuf::from(tokenizer));
        }
        if let Some(key) = var(ENV_API_KEY) {
            self.embedding.api_key = Some(key);
        }
        Ok(())
    }

    /// Apply `--key` and `--dir`
    pub fn apply_flags(&mut self, key: Option<&str>, dir: Option<&Path>) {
        if let Some(key) = key {
            self.embedding.api_key = Some(key.to_string());
        }
        if let Some(dir) = dir {
            self.storage_dir = dir.to_path_buf();
        }
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.embedding.api_key.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PdfQueryConfig::default();
        assert_eq!(config.storage_dir, PathBuf::from("vector"));
        assert_eq!(config.chunking.size, 1000);
        assert_eq!(config.chunking.overlap, 200);
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.embedding.batch_size, 1000);
        assert_eq!(config.chat.model, "gpt-4o-mini");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PdfQueryConfig::from_toml(
            r#"
storage_dir = "indices"

[chunking]
size = 500

[embedding]
mode = "stub"
"#,
        )
        .unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("indices"));
        assert_eq!(config.chunking.size, 500);
        assert_eq!(config.chunking.overlap, 200);
        assert_eq!(config.embedding.mode, EmbeddingMode::Stub);
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.chat, ChatConfig::default());
    }

    #[test]
    fn test_bad_toml_is_error() {
        assert!(PdfQueryConfig::from_toml("storage_dir = [").is_err());
        assert!(PdfQueryConfig::from_toml("[embedding]\nmode = \"local\"").is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = PdfQueryConfig::from_toml("storage_dir = \"from-file\"").unwrap();
        config
            .apply_env(env(&[
                (ENV_STORAGE_DIR, "from-env"),
                (ENV_EMBEDDING_MODE, "stub"),
                (ENV_TOKENIZER, "tokenizer.json"),
                (ENV_API_KEY, "sk-env"),
                (ENV_EMBEDDING_MODEL, ""),
            ]))
            .unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("from-env"));
        assert_eq!(config.embedding.mode, EmbeddingMode::Stub);
        assert_eq!(
            config.chunking.tokenizer_path,
            Some(PathBuf::from("tokenizer.json"))
        );
        assert_eq!(config.api_key(), Some("sk-env"));
        assert_eq!(config.embedding.model, "text-embedding-3-small");
    }

    #[test]
    fn test_invalid_env_mode() {
        let mut config = PdfQueryConfig::default();
        assert!(config
            .apply_env(env(&[(ENV_EMBEDDING_MODE, "local")]))
            .is_err());
    }

    #[test]
    fn test_flags_override_env() {
        let mut config = PdfQueryConfig::default();
        config
            .apply_env(env(&[(ENV_API_KEY, "sk-env"), (ENV_STORAGE_DIR, "env-dir")]))
            .unwrap();
        config.apply_flags(Some("sk-flag"), Some(Path::new("flag-dir")));
        assert_eq!(config.api_key(), Some("sk-flag"));
        assert_eq!(config.storage_dir, PathBuf::from("flag-dir"));

        config.apply_flags(None, None);
        assert_eq!(config.api_key(), Some("sk-flag"));
    }
}
