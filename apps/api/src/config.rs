use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 30 * 60;
const DEFAULT_SESSION_SWEEP_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub analysis_api_url: String,
    pub analysis_api_key: Option<String>,
    pub analysis_timeout: Duration,
    pub speech_api_url: String,
    pub speech_timeout: Duration,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub session_idle_ttl: Duration,
    pub session_sweep_interval: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            analysis_api_url: require_env("ANALYSIS_API_URL")?,
            analysis_api_key: std::env::var("ANALYSIS_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            analysis_timeout: Duration::from_secs(parse_env(
                "ANALYSIS_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            speech_api_url: require_env("SPEECH_API_URL")?,
            speech_timeout: Duration::from_secs(parse_env(
                "SPEECH_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080)?,
            session_idle_ttl: Duration::from_secs(parse_env(
                "SESSION_IDLE_TTL_SECS",
                DEFAULT_SESSION_IDLE_TTL_SECS,
            )?),
            session_sweep_interval: Duration::from_secs(
                parse_env("SESSION_SWEEP_SECS", DEFAULT_SESSION_SWEEP_SECS)?.max(1),
            ),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
