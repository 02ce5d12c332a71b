//! Public types for the chat API
use serde::Deserialize;

pub use crate::chat::ChatMessage as ChatResponse;

/// A new message for an existing chat or, without a `chatId`, the
/// first message of a new chat
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}
