use anyhow::{Context, Result, bail};

use crate::auth::{create_auth_session, get_or_create_user};
use crate::core::db::async_db;

/// Issue a session token for `email`. Stands in for the identity
/// provider login when using the API directly.
pub async fn run(
    email: &str,
    name: Option<&str>,
    ttl: chrono::Duration,
    db_path: &str,
) -> Result<()> {
    if !email.contains('@') {
        bail!("Invalid email address: {}", email);
    }
    if ttl <= chrono::Duration::zero() {
        bail!("Session TTL must be a positive number of days");
    }

    let db = async_db(db_path).await.context("Failed to connect to db")?;
    let user = get_or_create_user(&db, email, name).await?;
    let session = create_auth_session(&db, &user.id, ttl).await?;

    println!("User: {} ({})", user.email, user.id);
    println!("Expires: {}", session.expires_at);
    println!("Token: {}", session.token);

    Ok(())
}
