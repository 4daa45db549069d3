use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub storage_retry_backoff: Duration,
    /// Offset used to turn "now" into the learner-facing calendar date.
    pub utc_offset: FixedOffset,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://lecture_scheduler.db".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            storage_retry_backoff: Duration::from_millis(200),
            utc_offset: Utc.fix(),
        }
    }
}

impl SchedulerConfig {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = parse("BIND_ADDR", addr)?;
        }
        if let Some(ms) = lookup("STORAGE_RETRY_BACKOFF_MS") {
            config.storage_retry_backoff = Duration::from_millis(parse("STORAGE_RETRY_BACKOFF_MS", ms)?);
        }
        if let Some(minutes) = lookup("SCHEDULE_UTC_OFFSET_MINUTES") {
            let parsed: i32 = parse("SCHEDULE_UTC_OFFSET_MINUTES", minutes.clone())?;
            config.utc_offset = parsed
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or(ConfigError::Invalid { key: "SCHEDULE_UTC_OFFSET_MINUTES", value: minutes })?;
        }

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
