use gemini_realtime::{DEFAULT_LIVE_URL, GeminiLiveClient};
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub live_url: String,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let live_url =
            std::env::var("GEMINI_LIVE_URL").unwrap_or_else(|_| DEFAULT_LIVE_URL.to_string());
        if !(live_url.starts_with("wss://") || live_url.starts_with("ws://")) {
            return Err(ConfigError::InvalidValue(
                "GEMINI_LIVE_URL".to_string(),
                format!("'{}' is not a WebSocket URL", live_url),
            ));
        }

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            gemini_api_key,
            live_url,
            log_level,
        })
    }

    /// The live endpoint with the API key attached. Only needed when connecting.
    pub fn live_endpoint(&self) -> Result<String, ConfigError> {
        let api_key = self.gemini_api_key.as_deref().ok_or_else(|| {
            ConfigError::MissingVar("GEMINI_API_KEY must be set to connect".to_string())
        })?;
        Ok(GeminiLiveClient::endpoint(&self.live_url, api_key))
    }
}
