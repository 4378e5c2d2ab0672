// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value storage slots and the in-memory backend.

use crate::error::AppError;
use dashmap::DashMap;
use std::sync::Arc;

/// Synchronous string key-value storage, modelled on browser local storage.
///
/// Implementations must be safe to share between several session stores.
/// Two stores on the same storage behave like two tabs on one origin:
/// the last write wins.
pub trait KeyValueStorage: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Remove `key`. No-op if the key does not exist.
    fn remove_item(&self, key: &str) -> Result<(), AppError>;
}

/// In-memory storage. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Arc<DashMap<String, String>>,
    /// Maximum total size in bytes of keys plus values.
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes pushing the total size past `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: Arc::new(DashMap::new()),
            quota: Some(quota),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|entry| entry.key() != key)
            .map(|entry| entry.key().len() + entry.value().len())
            .sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_excluding(key) + key.len() + value.len();
            if needed > quota {
                return Err(AppError::QuotaExceeded { needed, quota });
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), AppError> {
        self.items.remove(key);
        Ok(())
    }
}
