// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer (key-value slots and session persistence).

pub mod file;
pub mod persistence;
pub mod storage;

pub use file::FileStorage;
pub use persistence::SessionPersistence;
pub use storage::{KeyValueStorage, MemoryStorage};

/// Storage keys as constants.
pub mod keys {
    /// The session aggregate (tokens, athlete, wheel settings).
    pub const SESSION: &str = "strava.session.v1";
}
