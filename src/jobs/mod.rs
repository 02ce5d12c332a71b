//! Background jobs that run on a fixed interval for the lifetime of
//! the server.
use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use crate::core::AppConfig;

mod purge_expired_sessions;

pub use purge_expired_sessions::PurgeExpiredSessions;

#[async_trait]
pub trait PeriodicJob: Debug + Send + Sync + 'static {
    fn interval(&self) -> Duration;

    async fn run_job(&self, config: &AppConfig, db: &Connection);
}

/// Spawn `job` in its own task. The first run happens right away,
/// then once every `interval`.
pub fn spawn_periodic_job<J: PeriodicJob>(config: AppConfig, db: Connection, job: J) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(job.interval());
        loop {
            interval.tick().await;
            tracing::debug!("Running periodic job {:?}", job);
            job.run_job(&config, &db).await;
        }
    });
}
