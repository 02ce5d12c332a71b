use std::sync::Arc;

use anyhow::Result;
use tokio_rusqlite::Connection;

use crate::core::AppConfig;
use crate::gemini::GeminiClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub db: Connection,
    pub config: AppConfig,
    // Built once at startup and reused for every request
    pub gemini: GeminiClient,
}

impl AppState {
    pub fn new(db: Connection, config: AppConfig) -> Result<Self> {
        let gemini = GeminiClient::new(
            &config.gemini_api_hostname,
            &config.gemini_api_key,
            &config.gemini_model,
            config.system_message.as_deref(),
            config.gemini_timeout,
        )?;
        Ok(Self { db, config, gemini })
    }
}
