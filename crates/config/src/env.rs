use pulse_common::error::{PulseError, PulseResult};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub metric_lookback_days: i64,
    pub recommendation_cache_ttl_secs: i64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads required vars.
    pub fn from_env() -> PulseResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        Ok(Self {
            database_url: get_var("DATABASE_URL")?,
            host: get_var_or("HOST", "0.0.0.0"),
            port: parse_var_or("PORT", "8080")?,
            log_level: get_var_or("LOG_LEVEL", "info"),
            metric_lookback_days: parse_var_or("METRIC_LOOKBACK_DAYS", "90")?,
            recommendation_cache_ttl_secs: parse_var_or("RECOMMENDATION_CACHE_TTL_SECS", "900")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn get_var(key: &str) -> PulseResult<String> {
    env::var(key).map_err(|_| PulseError::Config(format!("{key} is required but not set")))
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_var_or<T>(key: &str, default: &str) -> PulseResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_var_or(key, default)
        .parse()
        .map_err(|e| PulseError::Config(format!("invalid {key}: {e}")))
}

/// Read an optional numeric setting. Unset or unparsable values yield
/// `default`; an unparsable value is logged.
pub fn optional_var_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = env::var(key) else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                key,
                value = %raw,
                error = %e,
                %default,
                "invalid setting, using default"
            );
            default
        }
    }
}
