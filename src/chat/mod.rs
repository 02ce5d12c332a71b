//! Chats, their messages and the context sent along with each new
//! message.
mod context;
pub mod db;
mod models;

pub use context::{DEFAULT_CONTEXT_CAP, Turn, TurnRole, assemble_context};
pub use db::{
    create_chat, delete_chat, find_chat_by_id, find_chat_messages, find_chats_by_user,
    find_recent_chat_messages, insert_chat_message,
};
pub use models::{Chat, ChatMessage, MessageRole, chat_title};
