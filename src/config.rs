use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::source::ExclusionFilter;

const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_MIN_TRACK_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Could not resolve a home directory for the data dir")]
    NoHomeDir,
}

/// Runtime configuration for the media library core
///
/// Loaded from the environment, with an optional `.env` file picked up first.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding the playlist database
    pub data_dir: PathBuf,
    /// Quiet period before a directory re-queries its source
    pub debounce: Duration,
    /// Tracks this short (in whole seconds) or shorter never reach the lists
    pub min_track_secs: u64,
    /// Paths hidden from every list, including everything below them
    pub blacklist: Vec<String>,
    /// Fallback log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Config {
    /// Load configuration from `.env` (if present) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_ok() {
            debug!("Config: loaded .env file");
        }

        Self::from_env()
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = match std::env::var("MEDIALIB_DATA_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .ok_or(ConfigError::NoHomeDir)?
                .join(".medialib"),
        };

        let debounce_ms = parse_var("MEDIALIB_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;
        let min_track_secs = parse_var("MEDIALIB_MIN_TRACK_SECS", DEFAULT_MIN_TRACK_SECS)?;

        let blacklist = std::env::var("MEDIALIB_BLACKLIST")
            .map(|v| parse_blacklist(&v))
            .unwrap_or_default();

        let log_level =
            std::env::var("MEDIALIB_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        info!(
            "Config: data dir {}, debounce {}ms, {} blacklisted paths",
            data_dir.display(),
            debounce_ms,
            blacklist.len()
        );

        Ok(Self {
            data_dir,
            debounce: Duration::from_millis(debounce_ms),
            min_track_secs,
            blacklist,
            log_level,
        })
    }

    /// Path of the SQLite playlist store
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("playlists.db")
    }

    /// The exclusion predicate applied at the record source boundary
    pub fn exclusion(&self) -> ExclusionFilter {
        ExclusionFilter::new(self.blacklist.clone(), self.min_track_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".medialib"),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_track_secs: DEFAULT_MIN_TRACK_SECS,
            blacklist: Vec::new(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

fn parse_var(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(default),
    }
}

fn parse_blacklist(value: &str) -> Vec<String> {
    value
        .split(':')
        .map(|p| p.trim().trim_end_matches('/'))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blacklist_skips_empty_segments() {
        let paths = parse_blacklist("/music/podcasts/::/tmp/ ");
        assert_eq!(paths, vec!["/music/podcasts", "/tmp"]);
    }

    #[test]
    fn test_database_path_lives_in_data_dir() {
        let config = Config {
            data_dir: PathBuf::from("/var/lib/medialib"),
            ..Config::default()
        };
        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/medialib/playlists.db")
        );
    }

    #[test]
    fn test_exclusion_carries_settings() {
        let config = Config {
            blacklist: vec!["/music/voice".to_string()],
            min_track_secs: 45,
            ..Config::default()
        };
        let exclusion = config.exclusion();
        assert_eq!(exclusion.min_track_secs, 45);
        assert_eq!(exclusion.blacklist, vec!["/music/voice".to_string()]);
    }
}
