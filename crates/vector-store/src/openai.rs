//! Blocking client for an OpenAI-compatible `/embeddings` endpoint.

use crate::embeddings::EmbeddingBackend;
use crate::error::{Result, VectorStoreError};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

pub struct OpenAiBackend {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(api_base: &str, api_key: Option<&str>, model: &str) -> Result<Self> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                VectorStoreError::EmbeddingError(
                    "No API key configured (set OPENAI_API_KEY or pass --key)".to_string(),
                )
            })?;

        Ok(Self {
            client: Client::builder().build()?,
            endpoint: format!("{}/embeddings", api_base.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

impl EmbeddingBackend for OpenAiBackend {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(VectorStoreError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let mut body: EmbeddingResponse = response.json()?;
        // `index` is the input position.
        body.data.sort_by_key(|datum| datum.index);
        Ok(body.data.into_iter().map(|datum| datum.embedding).collect())
    }
}
