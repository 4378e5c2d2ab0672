// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session models: OAuth tokens, athlete profile and the persisted aggregate.

use crate::models::wheel::WheelSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Strava OAuth token payload.
///
/// Replaced wholesale on every update, never patched field by field.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TokenPayload {
    pub token_type: String,
    pub access_token: String,
    /// Epoch seconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub expires_at: i64,
    /// Seconds until expiry at issue time
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub expires_in: i64,
    pub refresh_token: String,
}

impl TokenPayload {
    /// Expiry as a UTC timestamp, if `expires_at` is representable.
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }

    /// Whether the access token has expired at `now`.
    ///
    /// Informational only: the session store never acts on expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at
    }
}

impl fmt::Debug for TokenPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPayload")
            .field("token_type", &self.token_type)
            .field("access_token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &"[redacted]")
            .finish()
    }
}

/// Athlete profile as returned by Strava.
///
/// Stored and returned as-is; nothing here interprets its contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/", type = "Record<string, unknown>")
)]
pub struct AthleteProfile(Map<String, Value>);

impl AthleteProfile {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for AthleteProfile {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AthleteProfile {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Input to `SessionStore::set_session`.
///
/// A field left as `None` clears the corresponding state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPayload {
    pub tokens: Option<TokenPayload>,
    pub athlete: Option<AthleteProfile>,
}

impl SessionPayload {
    pub fn new(tokens: TokenPayload, athlete: AthleteProfile) -> Self {
        Self {
            tokens: Some(tokens),
            athlete: Some(athlete),
        }
    }
}

/// Body of Strava's `/oauth/token` response (code exchange or refresh).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    #[serde(flatten)]
    pub tokens: TokenPayload,
    #[serde(default)]
    pub athlete: Option<AthleteProfile>,
}

impl From<TokenExchangeResponse> for SessionPayload {
    fn from(response: TokenExchangeResponse) -> Self {
        Self {
            tokens: Some(response.tokens),
            athlete: response.athlete,
        }
    }
}

/// The aggregate persisted under [`crate::db::keys::SESSION`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StoredSession {
    pub tokens: Option<TokenPayload>,
    pub athlete: Option<AthleteProfile>,
    pub wheel: WheelSettings,
}

impl StoredSession {
    /// True when a token payload is present (expiry is not checked).
    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }
}
