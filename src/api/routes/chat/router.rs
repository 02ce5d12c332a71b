//! Router for the chat API

use axum::{Json, Router, extract::State, routing::post};

use super::public;
use crate::api::auth::AuthUser;
use crate::api::public::{ApiError, ApiJson};
use crate::api::state::SharedState;
use crate::chat::{
    Chat, MessageRole, assemble_context, chat_title, create_chat, find_chat_by_id,
    find_recent_chat_messages, insert_chat_message,
};

/// Send a message and get the model's reply. Creates a new chat when
/// no `chatId` is given.
///
/// The user's message is saved before calling the model so a failed
/// call leaves it in the chat without a reply.
async fn chat_handler(
    user: AuthUser,
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<public::ChatRequest>,
) -> Result<Json<public::ChatResponse>, ApiError> {
    let content = payload
        .content
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or(ApiError::BadRequest(String::from("Content is required")))?;
    let chat_id = payload.chat_id.as_deref().filter(|id| !id.is_empty());

    let db = &state.db;
    let context_cap = state.config.context_cap;

    let chat: Chat = match chat_id {
        None => {
            let chat = create_chat(db, user.id(), &chat_title(content)).await?;
            tracing::info!("Created chat {} for user {}", chat.id, user.id());
            chat
        }
        Some(id) => match find_chat_by_id(db, id).await? {
            Some(chat) if chat.is_owned_by(user.id()) => chat,
            _ => {
                return Err(ApiError::NotFound(String::from(
                    "Chat not found or unauthorized",
                )));
            }
        },
    };

    insert_chat_message(db, &chat.id, MessageRole::User, content).await?;

    let log = find_recent_chat_messages(db, &chat.id, context_cap).await?;
    let history = assemble_context(&log, context_cap);

    let reply = state.gemini.generate(&history, content).await?;

    let assistant_msg = insert_chat_message(db, &chat.id, MessageRole::Assistant, &reply).await?;

    Ok(Json(assistant_msg))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
