use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable is optional; the API key normally comes from the browser.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server-side fallback for requests that arrive without `x-api-key`.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub llm_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            anthropic_api_key: None,
            port: 0,
            rust_log: "debug".to_string(),
            llm_timeout_secs: 5,
        }
    }
}
