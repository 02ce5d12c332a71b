use async_trait::async_trait;
use std::time::Duration;
use tokio_rusqlite::Connection;

use super::PeriodicJob;
use crate::auth::delete_expired_auth_sessions;
use crate::core::AppConfig;

#[derive(Debug)]
pub struct PurgeExpiredSessions;

#[async_trait]
impl PeriodicJob for PurgeExpiredSessions {
    fn interval(&self) -> Duration {
        // Hourly
        Duration::from_secs(60 * 60)
    }

    async fn run_job(&self, _config: &AppConfig, db: &Connection) {
        match delete_expired_auth_sessions(db, chrono::Utc::now()).await {
            Ok(0) => {}
            Ok(count) => tracing::info!("Purged {} expired auth sessions", count),
            Err(e) => tracing::error!("Failed to purge expired auth sessions: {}", e),
        }
    }
}
