use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::chat::DEFAULT_CONTEXT_CAP;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: String,
    pub gemini_api_hostname: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_timeout: Duration,
    pub system_message: Option<String>,
    pub context_cap: usize,
    pub session_ttl: chrono::Duration,
}

impl AppConfig {
    pub fn storage_path_from_env() -> String {
        env::var("CHATTER_STORAGE_PATH").unwrap_or("./".to_string())
    }

    /// Directory holding the sqlite file. Doesn't need the rest of
    /// the config so db-only commands work without an API key.
    pub fn db_path_from_env() -> String {
        format!("{}/db", Self::storage_path_from_env().trim_end_matches('/'))
    }

    /// How long newly issued session tokens stay valid
    pub fn session_ttl_from_env() -> Result<chrono::Duration> {
        let days: i64 = parse_env("CHATTER_SESSION_TTL_DAYS", 30)?;
        Ok(chrono::Duration::days(days))
    }

    /// Build the config from the process environment. Only the Gemini
    /// API key is required, everything else has a default.
    pub fn from_env() -> Result<Self> {
        let db_path = Self::db_path_from_env();
        let gemini_api_key = env::var("GEMINI_API_KEY").context("Missing env var GEMINI_API_KEY")?;
        let gemini_api_hostname = env::var("CHATTER_GEMINI_HOST")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
        let gemini_model =
            env::var("CHATTER_GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());
        let system_message = env::var("CHATTER_SYSTEM_MESSAGE")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let context_cap = parse_env("CHATTER_CONTEXT_CAP", DEFAULT_CONTEXT_CAP)?;
        let session_ttl = Self::session_ttl_from_env()?;
        let timeout_secs: u64 = parse_env("CHATTER_GEMINI_TIMEOUT_SECS", 120)?;

        Ok(Self {
            db_path,
            gemini_api_hostname,
            gemini_api_key,
            gemini_model,
            gemini_timeout: Duration::from_secs(timeout_secs),
            system_message,
            context_cap,
            session_ttl,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value for {}: {}", key, val)),
        Err(_) => Ok(default),
    }
}
