use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::MarqueeError;

const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DATA_DIR: &str = ".marquee";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Catalog API
    pub omdb_api_key: String,
    pub omdb_base_url: String,
    pub request_timeout: Duration,

    // Local persistence (favorites, validated posters)
    pub data_dir: PathBuf,
}

impl Config {
    /// Config with defaults for everything but the API key.
    pub fn new(omdb_api_key: &str) -> Self {
        Self {
            omdb_api_key: omdb_api_key.to_string(),
            omdb_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, MarqueeError> {
        let timeout_secs = match env::var("OMDB_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                MarqueeError::Config(format!("OMDB_TIMEOUT_SECS must be a number, got {raw:?}"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            omdb_api_key: required_env("OMDB_API_KEY")?,
            omdb_base_url: env::var("OMDB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            data_dir: env::var("MARQUEE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
        })
    }

    /// Reject values that would make every request fail.
    pub fn validate(&self) -> Result<(), MarqueeError> {
        if self.omdb_api_key.trim().is_empty() {
            return Err(MarqueeError::Config("OMDb API key is blank".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(MarqueeError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Log the active configuration with the API key masked.
    pub fn log_redacted(&self) {
        tracing::info!(
            omdb_base_url = self.omdb_base_url.as_str(),
            omdb_api_key = %redact(&self.omdb_api_key),
            timeout_secs = self.request_timeout.as_secs(),
            data_dir = %self.data_dir.display(),
            "Loaded config"
        );
    }
}

fn required_env(key: &str) -> Result<String, MarqueeError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MarqueeError::Config(format!(
            "{key} environment variable is required"
        ))),
    }
}

fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(2).collect();
    format!("{visible}***")
}
