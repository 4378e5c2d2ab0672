// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Defensive read/write of the session aggregate.
//!
//! Nothing in here returns an error. Missing storage, missing or corrupt
//! data and failed writes all resolve to defaults (reads) or a logged no-op
//! (writes).

use crate::db::keys;
use crate::db::storage::KeyValueStorage;
use crate::models::{AthleteProfile, StoredSession, TokenPayload, WheelSettings};
use serde_json::Value;
use std::sync::Arc;

/// The single storage slot holding a [`StoredSession`].
#[derive(Clone)]
pub struct SessionPersistence {
    storage: Option<Arc<dyn KeyValueStorage>>,
    key: String,
}

impl SessionPersistence {
    /// Persistence backed by `storage` at the standard session key.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage: Some(storage),
            key: keys::SESSION.to_string(),
        }
    }

    /// Persistence for an environment without storage.
    ///
    /// Reads return defaults and writes do nothing.
    pub fn unavailable() -> Self {
        Self {
            storage: None,
            key: keys::SESSION.to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored aggregate, falling back to defaults on any problem.
    pub fn read(&self) -> StoredSession {
        let Some(storage) = &self.storage else {
            return StoredSession::default();
        };

        let raw = match storage.get_item(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return StoredSession::default(),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "Failed to read stored session");
                return StoredSession::default();
            }
        };

        parse_stored(&raw)
    }

    /// Serialize and store the aggregate. Failures are logged and dropped.
    pub fn write(&self, session: &StoredSession) {
        let Some(storage) = &self.storage else {
            return;
        };

        let raw = match serde_json::to_string(session) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize session");
                return;
            }
        };

        match storage.set_item(&self.key, &raw) {
            Ok(()) => tracing::debug!(key = %self.key, bytes = raw.len(), "Session persisted"),
            Err(e) => tracing::warn!(error = %e, key = %self.key, "Failed to persist session"),
        }
    }
}

/// Parse raw stored text into a session, defaulting whatever is unusable.
pub fn parse_stored(raw: &str) -> StoredSession {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Stored session is not valid JSON, using defaults");
            return StoredSession::default();
        }
    };

    let Value::Object(mut obj) = parsed else {
        tracing::warn!("Stored session is not a JSON object, using defaults");
        return StoredSession::default();
    };

    let tokens = match obj.remove("tokens") {
        None | Some(Value::Null) => None,
        Some(value) => serde_json::from_value::<TokenPayload>(value)
            .map_err(|e| tracing::warn!(error = %e, "Discarding malformed stored tokens"))
            .ok(),
    };

    let athlete = match obj.remove("athlete") {
        Some(Value::Object(map)) => Some(AthleteProfile::from(map)),
        _ => None,
    };

    StoredSession {
        tokens,
        athlete,
        wheel: WheelSettings::from_stored(obj.get("wheel")),
    }
}
