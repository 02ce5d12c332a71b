use anyhow::{Error, Result};
use rusqlite::{OptionalExtension, Row};
use tokio_rusqlite::{Connection, params};
use uuid::Uuid;

use super::models::{Chat, ChatMessage, MessageRole};

const CHAT_COLUMNS: &str = "id, title, user_id, created_at, updated_at";
const MESSAGE_COLUMNS: &str = "id, chat_id, role, content, created_at";

fn chat_from_row(row: &Row) -> rusqlite::Result<Chat> {
    Ok(Chat {
        id: row.get(0)?,
        title: row.get(1)?,
        user_id: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn message_from_row(row: &Row) -> rusqlite::Result<ChatMessage> {
    Ok(ChatMessage {
        id: row.get(0)?,
        chat_id: row.get(1)?,
        role: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub async fn create_chat(db: &Connection, user_id: &str, title: &str) -> Result<Chat, Error> {
    let now = crate::core::now();
    let chat = Chat {
        id: Uuid::new_v4().to_string(),
        title: title.to_owned(),
        user_id: user_id.to_owned(),
        created_at: now.clone(),
        updated_at: now,
    };
    let record = chat.clone();
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO chat (id, title, user_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            params![
                record.id,
                record.title,
                record.user_id,
                record.created_at,
                record.updated_at
            ],
        )?;
        Ok(())
    })
    .await?;

    Ok(chat)
}

pub async fn find_chat_by_id(db: &Connection, chat_id: &str) -> Result<Option<Chat>, Error> {
    let c_id = chat_id.to_owned();
    let chat = db
        .call(move |conn| {
            let chat = conn
                .query_row(
                    &format!("SELECT {} FROM chat WHERE id = ?", CHAT_COLUMNS),
                    [c_id],
                    chat_from_row,
                )
                .optional()?;
            Ok(chat)
        })
        .await?;
    Ok(chat)
}

/// All chats owned by the user, most recently updated first
pub async fn find_chats_by_user(db: &Connection, user_id: &str) -> Result<Vec<Chat>, Error> {
    let u_id = user_id.to_owned();
    let chats = db
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM chat WHERE user_id = ? ORDER BY updated_at DESC, rowid DESC",
                CHAT_COLUMNS
            ))?;
            let rows = stmt
                .query_map([u_id], chat_from_row)?
                .collect::<rusqlite::Result<Vec<Chat>>>()?;
            Ok(rows)
        })
        .await?;
    Ok(chats)
}

/// Delete a chat and all of its messages. Returns the number of chats
/// removed which is 0 when it didn't exist.
pub async fn delete_chat(db: &Connection, chat_id: &str) -> Result<usize, Error> {
    let c_id = chat_id.to_owned();
    let deleted = db
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM chat_message WHERE chat_id = ?", [&c_id])?;
            let deleted = tx.execute("DELETE FROM chat WHERE id = ?", [&c_id])?;
            tx.commit()?;
            Ok(deleted)
        })
        .await?;
    Ok(deleted)
}

/// Save a message and bump the chat's `updated_at` so it sorts to
/// the top of the chat list.
pub async fn insert_chat_message(
    db: &Connection,
    chat_id: &str,
    role: MessageRole,
    content: &str,
) -> Result<ChatMessage, Error> {
    let msg = ChatMessage {
        id: Uuid::new_v4().to_string(),
        chat_id: chat_id.to_owned(),
        role,
        content: content.to_owned(),
        created_at: crate::core::now(),
    };
    let record = msg.clone();
    db.call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO chat_message (id, chat_id, role, content, created_at) VALUES (?, ?, ?, ?, ?)",
            params![
                record.id,
                record.chat_id,
                record.role,
                record.content,
                record.created_at
            ],
        )?;
        tx.execute(
            "UPDATE chat SET updated_at = ? WHERE id = ?",
            params![record.created_at, record.chat_id],
        )?;
        tx.commit()?;
        Ok(())
    })
    .await?;

    Ok(msg)
}

/// The full message log for a chat, oldest first
pub async fn find_chat_messages(db: &Connection, chat_id: &str) -> Result<Vec<ChatMessage>, Error> {
    let c_id = chat_id.to_owned();
    let messages = db
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM chat_message WHERE chat_id = ? ORDER BY created_at ASC, rowid ASC",
                MESSAGE_COLUMNS
            ))?;
            let rows = stmt
                .query_map([c_id], message_from_row)?
                .collect::<rusqlite::Result<Vec<ChatMessage>>>()?;
            Ok(rows)
        })
        .await?;
    Ok(messages)
}

/// The most recent `limit` messages of a chat, oldest first
pub async fn find_recent_chat_messages(
    db: &Connection,
    chat_id: &str,
    limit: usize,
) -> Result<Vec<ChatMessage>, Error> {
    let c_id = chat_id.to_owned();
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut messages = db
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM chat_message WHERE chat_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?",
                MESSAGE_COLUMNS
            ))?;
            let rows = stmt
                .query_map(params![c_id, limit], message_from_row)?
                .collect::<rusqlite::Result<Vec<ChatMessage>>>()?;
            Ok(rows)
        })
        .await?;
    messages.reverse();
    Ok(messages)
}
