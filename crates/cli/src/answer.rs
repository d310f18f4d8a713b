use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer the user's question ONLY using the provided PDF context.\n";

/// Separator between retrieved chunks in the prompt context
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

#[must_use]
pub fn build_context(chunks: &[String]) -> String {
    chunks.join(CONTEXT_SEPARATOR)
}

#[must_use]
pub fn user_message(context: &str, question: &str) -> String {
    format!("Context:\n{context}\n\nQuestion: {question}")
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Answers questions from retrieved context over an OpenAI-compatible chat API
pub struct ChatClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(api_base: &str, api_key: Option<&str>, model: &str) -> Result<Self> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("An API key is required; pass --key or set OPENAI_API_KEY"))?;
        Ok(Self {
            client: reqwest::blocking::Client::builder()
                .build()
                .context("Failed to build HTTP client")?,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask `question` with `chunks` as the only context; returns the trimmed reply
    pub fn answer(&self, chunks: &[String], question: &str) -> Result<String> {
        let user = user_message(&build_context(chunks), question);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
        };

        log::debug!("Asking '{}' with {} context chunks", self.model, chunks.len());
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .context("Chat completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("Chat completion failed with status {status}: {body}");
        }

        let parsed: ChatResponse = response
            .json()
            .context("Invalid chat completion response")?;
        parse_answer(parsed)
    }
}

fn parse_answer(response: ChatResponse) -> Result<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| anyhow!("Chat completion returned no answer"))?;
    Ok(content.trim().to_string())
}
