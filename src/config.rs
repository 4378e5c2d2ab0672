// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local use.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Where the session aggregate is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// One file per key under `storage_dir`.
    File,
    /// Process memory only; lost on exit.
    Memory,
    /// No storage at all. The store keeps defaults in memory.
    None,
}

impl FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageKind::File),
            "memory" => Ok(StorageKind::Memory),
            "none" | "off" => Ok(StorageKind::None),
            other => Err(ConfigError::Invalid {
                var: "WHEELLOOP_STORAGE",
                value: other.to_string(),
            }),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend for the session aggregate
    pub storage: StorageKind,
    /// Directory used by file storage
    pub storage_dir: PathBuf,
    /// Sampling temperature for commentary requests
    pub chat_temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageKind::File,
            storage_dir: PathBuf::from(".wheelloop"),
            chat_temperature: 0.7,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage = match lookup("WHEELLOOP_STORAGE") {
            Some(value) => value.parse()?,
            None => defaults.storage,
        };

        let storage_dir = lookup("WHEELLOOP_STORAGE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_dir);

        let chat_temperature = match lookup("WHEELLOOP_CHAT_TEMPERATURE") {
            Some(value) => {
                let parsed = value.trim().parse::<f32>().ok();
                match parsed {
                    Some(t) if (0.0..=2.0).contains(&t) => t,
                    _ => {
                        return Err(ConfigError::Invalid {
                            var: "WHEELLOOP_CHAT_TEMPERATURE",
                            value,
                        })
                    }
                }
            }
            None => defaults.chat_temperature,
        };

        Ok(Self {
            storage,
            storage_dir,
            chat_temperature,
        })
    }

    /// Config for tests: in-memory storage.
    pub fn test_default() -> Self {
        Self {
            storage: StorageKind::Memory,
            ..Self::default()
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
