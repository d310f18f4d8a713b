//! Support code for the `pdfquery` binary: layered configuration and
//! chat-completion answers over retrieved chunks.

pub mod answer;
pub mod config;

pub use answer::{build_context, user_message, ChatClient, DEFAULT_CHAT_MODEL, SYSTEM_PROMPT};
pub use config::{ChatConfig, PdfQueryConfig, CONFIG_FILE_NAME};
