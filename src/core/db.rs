//! SQLite connection and schema management
use std::path::Path;

use anyhow::{Error, Result};
use rusqlite::Connection as SyncConnection;
use tokio_rusqlite::Connection;

pub const DB_FILE_NAME: &str = "chatter.sqlite3";

/// Open the database that lives inside `db_path`
pub async fn async_db(db_path: &str) -> Result<Connection, Error> {
    let file = Path::new(db_path).join(DB_FILE_NAME);
    let db = Connection::open(file).await?;
    db.call(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    })
    .await?;
    Ok(db)
}

/// Create all tables from scratch. Safe to call on an existing db.
pub fn initialize_db(conn: &SyncConnection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS user (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS auth_session (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS chat (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            user_id TEXT NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS chat_message (
            id TEXT PRIMARY KEY,
            chat_id TEXT NOT NULL REFERENCES chat(id) ON DELETE CASCADE,
            role TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
            content TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )?;
    migrate_db(conn)
}

/// Idempotent schema changes applied on top of `initialize_db`
pub fn migrate_db(conn: &SyncConnection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_auth_session_expires_at ON auth_session(expires_at);
        CREATE INDEX IF NOT EXISTS idx_chat_user_updated ON chat(user_id, updated_at);
        CREATE INDEX IF NOT EXISTS idx_chat_message_chat_created ON chat_message(chat_id, created_at);
        "#,
    )
}
