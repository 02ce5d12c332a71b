mod config;
pub mod db;

pub use config::AppConfig;

/// Timestamps are stored as RFC 3339 text with a fixed width so
/// ordering by the column matches chronological order.
pub fn timestamp(dt: chrono::DateTime<chrono::Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

pub fn now() -> String {
    timestamp(chrono::Utc::now())
}
