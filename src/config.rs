// Runtime configuration.
// Reads the feed URL, cache location, logging and HTTP settings from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::filter::LevelFilter;
use url::Url;

use crate::cache::paths;
use crate::error::{Error, Result};

pub const FEED_URL_VAR: &str = "FEEDFETCHER_FEED_URL";
pub const CACHE_DIR_VAR: &str = "FEEDFETCHER_CACHE_DIR";
pub const LOG_LEVEL_VAR: &str = "FEEDFETCHER_LOG_LEVEL";
pub const LOG_FORMAT_VAR: &str = "FEEDFETCHER_LOG_FORMAT";
pub const HTTP_TIMEOUT_VAR: &str = "FEEDFETCHER_HTTP_TIMEOUT_SECS";

/// Default request timeout: 30 seconds.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::Config(format!(
                "{}: unknown log format '{}'",
                LOG_FORMAT_VAR, other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Compact,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the remote feed document lives.
    pub feed_url: Url,
    /// Root directory of the local cache.
    pub cache_dir: PathBuf,
    pub logging: LoggingSettings,
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup function.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |key: &str| {
            var(key).and_then(|value| {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
        };

        let feed_url = lookup(FEED_URL_VAR).ok_or(Error::MissingFeedUrl)?;
        let feed_url = Url::parse(&feed_url)?;

        let cache_dir = match lookup(CACHE_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => paths::default_cache_dir().ok_or(Error::NoCacheDir)?,
        };

        let level = match lookup(LOG_LEVEL_VAR) {
            Some(level) => LevelFilter::from_str(&level)
                .map_err(|err| Error::Config(format!("{}: {}", LOG_LEVEL_VAR, err)))?,
            None => LevelFilter::INFO,
        };

        let format = match lookup(LOG_FORMAT_VAR) {
            Some(format) => format.parse()?,
            None => LogFormat::default(),
        };

        let http_timeout = match lookup(HTTP_TIMEOUT_VAR) {
            Some(secs) => secs
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|err| Error::Config(format!("{}: {}", HTTP_TIMEOUT_VAR, err)))?,
            None => DEFAULT_HTTP_TIMEOUT,
        };

        Ok(Self {
            feed_url,
            cache_dir,
            logging: LoggingSettings { level, format },
            http_timeout,
        })
    }
}
