use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://submissions.db";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Application configuration loaded from environment variables.
/// Nothing here is required: absent generation credentials select fallback mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub generation: GenerationConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            generation: GenerationConfig::from_env()?,
        })
    }
}

/// Settings for the text-generation service.
///
/// `credential` is the live/fallback switch: `None` means no outbound calls are
/// ever made and every generation reports failure immediately.
#[derive(Clone)]
pub struct GenerationConfig {
    pub credential: Option<String>,
    pub model: String,
    /// Models endpoint root; `{api_base}/{model}:generateContent` is called.
    pub api_base: String,
    pub request_timeout: Duration,
}

impl GenerationConfig {
    pub fn from_env() -> Result<Self> {
        let credential = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let timeout_secs = match std::env::var("GEMINI_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("GEMINI_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(GenerationConfig {
            credential,
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_base: std::env::var("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Configuration with no credential. Used by tests and offline runs.
    pub fn offline() -> Self {
        GenerationConfig {
            credential: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn is_live(&self) -> bool {
        self.credential.is_some()
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_config_is_not_live() {
        let config = GenerationConfig::offline();
        assert!(!config.is_live());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_credential_makes_config_live() {
        let config = GenerationConfig {
            credential: Some("key".to_string()),
            ..GenerationConfig::offline()
        };
        assert!(config.is_live());
    }

    #[test]
    fn test_debug_output_redacts_credential() {
        let config = GenerationConfig {
            credential: Some("super-secret".to_string()),
            ..GenerationConfig::offline()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
