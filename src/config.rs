//! Configuration file parser for ~/.config/newsdesk/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted, though we log a warning for each one since
//! they are usually typos.
use crate::news::{Category, DEFAULT_TIMEOUT};
use crate::proxy::DEFAULT_UPSTREAM_URL;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the NewsAPI key. Takes precedence over the file.
pub const API_KEY_ENV: &str = "NEWSAPI_KEY";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level configuration, shared by the reader and the relay.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Relay endpoint the reader fetches from.
    pub proxy_url: String,

    /// Address `newsdesk serve` binds to.
    pub listen_addr: String,

    /// NewsAPI base URL the relay forwards to.
    pub upstream_url: String,

    /// Reader-side request timeout in seconds.
    pub request_timeout_secs: u64,

    /// NewsAPI key for the relay (alternative to the NEWSAPI_KEY env var).
    pub newsapi_key: Option<String>,

    /// Category selected at startup.
    pub default_category: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy_url: "http://127.0.0.1:8787/api/news".to_string(),
            listen_addr: "127.0.0.1:8787".to_string(),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            newsapi_key: None,
            default_category: "all".to_string(),
        }
    }
}

/// Mask `newsapi_key` so the credential never reaches logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("proxy_url", &self.proxy_url)
            .field("listen_addr", &self.listen_addr)
            .field("upstream_url", &self.upstream_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field(
                "newsapi_key",
                &self.newsapi_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("default_category", &self.default_category)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "proxy_url",
        "listen_addr",
        "upstream_url",
        "request_timeout_secs",
        "newsapi_key",
        "default_category",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing or empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    /// - Unknown keys → accepted, logged as a warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        tracing::info!(
            proxy_url = %config.proxy_url,
            category = %config.default_category,
            "Loaded configuration"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        self.category()?;
        Ok(())
    }

    /// The startup category.
    pub fn category(&self) -> Result<Category, ConfigError> {
        self.default_category
            .parse()
            .map_err(|e: crate::news::UnknownCategory| ConfigError::Invalid {
                key: "default_category",
                reason: e.to_string(),
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolve the NewsAPI key: the environment wins over the file.
    ///
    /// Blank values count as unset.
    pub fn api_key(&self) -> Option<SecretString> {
        resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.newsapi_key.as_deref())
    }
}

fn resolve_api_key(env: Option<String>, file: Option<&str>) -> Option<SecretString> {
    env.filter(|v| !v.trim().is_empty())
        .or_else(|| {
            file.map(str::to_string)
                .filter(|v| !v.trim().is_empty())
        })
        .map(|v| SecretString::from(v.trim().to_string()))
}

// ============================================================================
// Tests
// ============================================================================
