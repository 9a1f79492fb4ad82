//! Configuration types for bl-replays

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Remote leaderboard API settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the leaderboard API (default: "https://api.beatleader.xyz")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Leaderboards requested per listing page (default: 100)
    ///
    /// A page shorter than this ends the walk.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Scores requested per leaderboard (default: 10)
    #[serde(default = "default_scores_per_leaderboard")]
    pub scores_per_leaderboard: u32,

    /// First listing page to request (default: 1)
    #[serde(default = "default_start_page")]
    pub start_page: u32,

    /// Per-request timeout in seconds (default: 60)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            scores_per_leaderboard: default_scores_per_leaderboard(),
            start_page: default_start_page(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Where and how note tables are written
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory holding one sub-directory per leaderboard (default: "../replays")
    #[serde(default = "default_output_root")]
    pub root: PathBuf,

    /// File extension of the note tables (default: "npy")
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            extension: default_extension(),
        }
    }
}

/// Retry behavior for leaderboard listing and score list requests
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 5)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 60 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// Main configuration for a harvest run
///
/// Every field has a default, so an empty TOML file is a valid configuration
/// that reproduces a plain run against the public API.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Output location settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Retry settings for listing requests
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Config {
    /// Load a configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the values that would otherwise fail deep inside a run
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.api.base_url)
            .map_err(|e| Error::config("api.base_url", format!("invalid URL: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::config("api.base_url", "URL cannot be used as a base"));
        }
        if self.api.page_size == 0 {
            return Err(Error::config("api.page_size", "must be greater than zero"));
        }
        if self.api.scores_per_leaderboard == 0 {
            return Err(Error::config(
                "api.scores_per_leaderboard",
                "must be greater than zero",
            ));
        }
        if self.api.start_page == 0 {
            return Err(Error::config("api.start_page", "pages are numbered from 1"));
        }
        if self.output.extension.is_empty() || self.output.extension.contains('.') {
            return Err(Error::config(
                "output.extension",
                "must be a bare extension such as \"npy\"",
            ));
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(Error::config(
                "retry.backoff_multiplier",
                "must be at least 1.0",
            ));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://api.beatleader.xyz".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_scores_per_leaderboard() -> u32 {
    10
}

fn default_start_page() -> u32 {
    1
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_user_agent() -> String {
    concat!("bl-replays/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_output_root() -> PathBuf {
    PathBuf::from("..").join("replays")
}

fn default_extension() -> String {
    "npy".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(60)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

// Durations are stored as whole seconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
