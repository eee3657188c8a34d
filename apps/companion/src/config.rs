use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::session::DEFAULT_SESSION_TTL_MINUTES;

pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Application configuration loaded from environment variables.
/// Startup fails if the API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    /// Serve canned answers for a few topics when the completion endpoint is unreachable.
    pub offline_fallback: bool,
    /// Idle minutes before a session is evicted.
    pub session_ttl_minutes: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|v| !v.trim().is_empty())
            .with_context(|| {
                format!(
                    "Required environment variable '{API_KEY_ENV}' is not set. \
                     Add `{API_KEY_ENV}=<your key>` to your environment or to a .env file \
                     next to the binary, then restart."
                )
            })?;

        let offline_fallback = match lookup("OFFLINE_FALLBACK") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("OFFLINE_FALLBACK must be true or false, got '{raw}'"))?,
            None => true,
        };

        let session_ttl_minutes = match lookup("SESSION_TTL_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .with_context(|| {
                    format!("SESSION_TTL_MINUTES must be a positive number of minutes, got '{raw}'")
                })?,
            None => DEFAULT_SESSION_TTL_MINUTES,
        };

        Ok(Config {
            api_key,
            model: lookup("COMPANION_MODEL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_url: lookup("COMPLETION_API_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            offline_fallback,
            session_ttl_minutes,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
