//! Configuration management for Trailmate.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::session::SessionKeys;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Document storage
    pub storage: StorageConfig,
    /// Keys of the session and profile entries
    pub session: SessionKeys,
    /// Log filter (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Document storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one file per document
    pub data_dir: PathBuf,
    /// Key of the hike collection
    pub hikes_key: String,
}

impl Config {
    /// Load configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SessionKeys::default();
        Self {
            storage: StorageConfig {
                data_dir: lookup("TRAILMATE_DATA_DIR")
                    .map_or_else(|| PathBuf::from("./trailmate-data"), PathBuf::from),
                hikes_key: lookup("TRAILMATE_HIKES_KEY").unwrap_or_else(|| "hikes".to_string()),
            },
            session: SessionKeys {
                user_id: lookup("TRAILMATE_USER_ID_KEY").unwrap_or(defaults.user_id),
                user_email: lookup("TRAILMATE_USER_EMAIL_KEY").unwrap_or(defaults.user_email),
                lower_text: lookup("TRAILMATE_LOWER_TEXT_KEY").unwrap_or(defaults.lower_text),
            },
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
