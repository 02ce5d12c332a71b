//! Public types for the chat history API
use serde::{Deserialize, Serialize};

use crate::chat::{Chat, ChatMessage};

pub type ChatListResponse = Vec<Chat>;

#[derive(Deserialize)]
pub struct DeleteChatQuery {
    pub id: Option<String>,
}

#[derive(Serialize)]
pub struct DeleteChatResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct ChatTranscriptResponse {
    pub chat: Chat,
    pub messages: Vec<ChatMessage>,
}
