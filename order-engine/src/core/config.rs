use chrono::{FixedOffset, Offset, Utc};
use std::path::PathBuf;

/// Default broadcast capacity for order events
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Engine configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Working directory for the order database |
/// | ORDER_DB_FILE | orders.redb | Database file name inside WORK_DIR |
/// | LOG_LEVEL | info | Log filter when RUST_LOG is unset |
/// | LOG_DIR | (none) | Directory for daily rolling log files |
/// | EVENT_CHANNEL_CAPACITY | 4096 | Order event broadcast buffer |
/// | BUSINESS_UTC_OFFSET_MINUTES | 0 | Campus time zone, used for serving days |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/cafeteria BUSINESS_UTC_OFFSET_MINUTES=480 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub work_dir: String,
    pub order_db_file: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub event_channel_capacity: usize,
    /// Minutes east of UTC
    pub business_utc_offset_minutes: i32,
}

impl EngineConfig {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            order_db_file: std::env::var("ORDER_DB_FILE")
                .unwrap_or_else(|_| "orders.redb".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            event_channel_capacity: std::env::var("EVENT_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|c| *c > 0)
                .unwrap_or(DEFAULT_EVENT_CHANNEL_CAPACITY),
            business_utc_offset_minutes: std::env::var("BUSINESS_UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    /// Read a `.env` file if present, then the environment
    pub fn load() -> Self {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!(error = %e, "No .env file loaded");
        }
        Self::from_env()
    }

    /// Override the working directory and offset
    ///
    /// Mostly used by tests
    pub fn with_overrides(work_dir: impl Into<String>, business_utc_offset_minutes: i32) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.business_utc_offset_minutes = business_utc_offset_minutes;
        config
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.order_db_file)
    }

    /// Business time zone; out-of-range offsets fall back to UTC
    pub fn business_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.business_utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| {
                tracing::warn!(
                    minutes = self.business_utc_offset_minutes,
                    "Invalid business UTC offset, using UTC"
                );
                Utc.fix()
            })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
