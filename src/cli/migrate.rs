use crate::core::db::{async_db, migrate_db};
use anyhow::{Context, Result};

pub async fn run(db_path: &str) -> Result<()> {
    println!("Migrating db...");
    let db = async_db(db_path).await.context("Failed to connect to db")?;
    db.call(|conn| {
        migrate_db(conn)?;
        Ok(())
    })
    .await
    .context("DB migration failed")?;
    println!("Finished migrating db");

    Ok(())
}
