//! Router for listing, viewing and deleting chats

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_extra::extract::Query;
use tokio_rusqlite::Connection;

use super::public;
use crate::api::auth::AuthUser;
use crate::api::public::ApiError;
use crate::api::state::SharedState;
use crate::chat::{Chat, delete_chat, find_chat_by_id, find_chat_messages, find_chats_by_user};

/// Look up a chat that must belong to `user`. Missing and foreign
/// chats are indistinguishable to the caller.
async fn find_owned_chat(db: &Connection, user: &AuthUser, id: &str) -> Result<Chat, ApiError> {
    match find_chat_by_id(db, id).await? {
        Some(chat) if chat.is_owned_by(user.id()) => Ok(chat),
        _ => Err(ApiError::NotFound(String::from("Chat not found"))),
    }
}

/// All of the user's chats, most recently updated first
async fn chat_list(
    user: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<public::ChatListResponse>, ApiError> {
    let chats = find_chats_by_user(&state.db, user.id()).await?;
    Ok(Json(chats))
}

/// A single chat with its full transcript
async fn chat_transcript(
    user: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<public::ChatTranscriptResponse>, ApiError> {
    let chat = find_owned_chat(&state.db, &user, &id).await?;
    let messages = find_chat_messages(&state.db, &chat.id).await?;
    Ok(Json(public::ChatTranscriptResponse { chat, messages }))
}

async fn chat_delete(
    user: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<public::DeleteChatQuery>,
) -> Result<Json<public::DeleteChatResponse>, ApiError> {
    let id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::BadRequest(String::from("ID required")))?;
    let chat = find_owned_chat(&state.db, &user, &id).await?;

    if delete_chat(&state.db, &chat.id).await? == 0 {
        // Lost a race with another delete
        return Err(ApiError::NotFound(String::from("Chat not found")));
    }
    tracing::info!("Deleted chat {} for user {}", chat.id, user.id());

    Ok(Json(public::DeleteChatResponse { success: true }))
}

/// Create the chats router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(chat_list).delete(chat_delete))
        .route("/{id}", get(chat_transcript))
}
