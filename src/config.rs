use std::env;

use crate::error::DispatchError;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub snapshot_max_age_secs: i64,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, DispatchError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            request_timeout_secs: parse_or_default("REQUEST_TIMEOUT_SECS", 10)?,
            snapshot_max_age_secs: parse_or_default("SNAPSHOT_MAX_AGE_SECS", 30)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn for_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout_secs: 10,
            snapshot_max_age_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, DispatchError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| DispatchError::Config(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
