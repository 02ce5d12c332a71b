use anyhow::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use tokio_rusqlite::{Connection, params};
use uuid::Uuid;

use super::models::{AuthSession, User};
use crate::core::timestamp;

pub async fn get_or_create_user(
    db: &Connection,
    email: &str,
    name: Option<&str>,
) -> Result<User, Error> {
    let email = email.trim().to_lowercase();
    let name = name.map(|n| n.to_owned());
    let new_id = Uuid::new_v4().to_string();
    let now = crate::core::now();

    let user = db
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT OR IGNORE INTO user (id, email, name, created_at) VALUES (?, ?, ?, ?)",
                params![new_id, email, name, now],
            )?;
            let user = tx.query_row(
                "SELECT id, email, name, created_at FROM user WHERE email = ?",
                [&email],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        name: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )?;
            tx.commit()?;
            Ok(user)
        })
        .await?;

    Ok(user)
}

/// Issue a new bearer token for the user valid for `ttl`
pub async fn create_auth_session(
    db: &Connection,
    user_id: &str,
    ttl: chrono::Duration,
) -> Result<AuthSession, Error> {
    let now = Utc::now();
    let session = AuthSession {
        token: Uuid::new_v4().simple().to_string(),
        user_id: user_id.to_owned(),
        created_at: timestamp(now),
        expires_at: timestamp(now + ttl),
    };
    let record = session.clone();
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO auth_session (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
            params![
                record.token,
                record.user_id,
                record.created_at,
                record.expires_at
            ],
        )?;
        Ok(())
    })
    .await?;

    Ok(session)
}

/// Resolve a bearer token to its user if the token hasn't expired
pub async fn find_user_by_token(
    db: &Connection,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<User>, Error> {
    let token = token.to_owned();
    let now = timestamp(now);
    let user = db
        .call(move |conn| {
            let user = conn
                .query_row(
                    r#"
                    SELECT u.id, u.email, u.name, u.created_at
                    FROM auth_session s
                    JOIN user u ON u.id = s.user_id
                    WHERE s.token = ?1 AND s.expires_at > ?2
                    "#,
                    params![token, now],
                    |row| {
                        Ok(User {
                            id: row.get(0)?,
                            email: row.get(1)?,
                            name: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(user)
        })
        .await?;
    Ok(user)
}

pub async fn delete_expired_auth_sessions(
    db: &Connection,
    now: DateTime<Utc>,
) -> Result<usize, Error> {
    let now = timestamp(now);
    let deleted = db
        .call(move |conn| {
            let deleted = conn.execute("DELETE FROM auth_session WHERE expires_at <= ?", [now])?;
            Ok(deleted)
        })
        .await?;
    Ok(deleted)
}
