// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session store: in-memory session and wheel settings, mirrored to storage.
//!
//! State lives in a `watch` channel. Every mutation that actually changes
//! the state notifies subscribers, and a persistence subscriber registered
//! at construction writes the latest snapshot to storage. When a Tokio
//! runtime is available the subscriber runs as a background task, so several
//! mutations in a row are coalesced into one write. Without a runtime,
//! or once the task's runtime has shut down, each change is written inline.
//!
//! Every write holds the store's write lock and reads the latest state
//! inside it, so a slow write of an older snapshot can never land after a
//! newer one.

use crate::db::SessionPersistence;
use crate::models::{
    AthleteProfile, SessionPayload, StoredSession, TokenPayload, WheelSettings,
    WheelSettingsPatch,
};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How state changes reach storage.
enum PersistMode {
    /// Background task fed by the state channel.
    Background(JoinHandle<()>),
    /// Written synchronously after each change.
    Inline,
}

/// Single source of truth for authentication state and chat settings.
pub struct SessionStore {
    state: watch::Sender<StoredSession>,
    /// Last snapshot handed to storage.
    persisted: Arc<watch::Sender<StoredSession>>,
    /// Held across each storage write and the matching `persisted` update.
    write_lock: Arc<Mutex<()>>,
    persistence: SessionPersistence,
    mode: PersistMode,
}

impl SessionStore {
    /// Create a store, loading its initial state from `persistence`.
    pub fn new(persistence: SessionPersistence) -> Self {
        let initial = persistence.read();
        tracing::debug!(
            authenticated = initial.is_authenticated(),
            storage = persistence.is_available(),
            "Session store initialized"
        );

        let (state, _) = watch::channel(initial.clone());
        let (persisted, _) = watch::channel(initial);
        let persisted = Arc::new(persisted);
        let write_lock = Arc::new(Mutex::new(()));

        let mode = match tokio::runtime::Handle::try_current() {
            Ok(handle) => PersistMode::Background(handle.spawn(run_persister(
                state.subscribe(),
                persistence.clone(),
                persisted.clone(),
                write_lock.clone(),
            ))),
            Err(_) => {
                tracing::debug!("No async runtime, persisting session changes inline");
                PersistMode::Inline
            }
        };

        Self {
            state,
            persisted,
            write_lock,
            persistence,
            mode,
        }
    }

    // ─── Reads ───────────────────────────────────────────────────

    pub fn tokens(&self) -> Option<TokenPayload> {
        self.state.borrow().tokens.clone()
    }

    pub fn athlete(&self) -> Option<AthleteProfile> {
        self.state.borrow().athlete.clone()
    }

    pub fn wheel_settings(&self) -> WheelSettings {
        self.state.borrow().wheel.clone()
    }

    /// Copy of the whole aggregate.
    pub fn snapshot(&self) -> StoredSession {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Receiver notified after every effective state change.
    pub fn subscribe(&self) -> watch::Receiver<StoredSession> {
        self.state.subscribe()
    }

    // ─── Session Operations ──────────────────────────────────────

    /// Replace tokens and athlete together. `None` fields are cleared.
    pub fn set_session(&self, payload: SessionPayload) {
        let SessionPayload { tokens, athlete } = payload;
        let authenticated = tokens.is_some();
        self.mutate(|state| {
            state.tokens = tokens;
            state.athlete = athlete;
        });
        tracing::info!(authenticated, "Session set");
    }

    /// Clear tokens and athlete, then write to storage immediately.
    ///
    /// Wheel settings are kept.
    pub fn clear_session(&self) {
        self.apply(|state| {
            state.tokens = None;
            state.athlete = None;
        });
        self.persist_now();
        tracing::info!("Session cleared");
    }

    /// Reload all state from storage, discarding in-memory values.
    ///
    /// Used to pick up writes made by another store sharing the storage.
    pub fn restore_from_storage(&self) {
        let restored = self.persistence.read();
        let authenticated = restored.is_authenticated();
        let changed = self.mutate(|state| *state = restored);
        tracing::info!(authenticated, changed, "Session restored from storage");
    }

    pub fn set_tokens(&self, tokens: Option<TokenPayload>) {
        self.mutate(|state| state.tokens = tokens);
    }

    pub fn set_athlete(&self, athlete: Option<AthleteProfile>) {
        self.mutate(|state| state.athlete = athlete);
    }

    // ─── Settings Operations ─────────────────────────────────────

    /// Merge `patch` into the current wheel settings.
    pub fn set_wheel_settings(&self, patch: WheelSettingsPatch) {
        self.mutate(|state| state.wheel.apply(patch));
        tracing::debug!("Wheel settings updated");
    }

    /// Arbitrary mutation. `f` must not call back into this store.
    pub fn update(&self, f: impl FnOnce(&mut StoredSession)) -> bool {
        self.mutate(f)
    }

    // ─── Persistence ─────────────────────────────────────────────

    /// Wait until the current state has been handed to storage.
    ///
    /// A write that storage rejected still counts as handed over. If the
    /// persistence task has already stopped (its runtime shut down), the
    /// state is written inline instead of waiting. A task that stops while
    /// this call is waiting is not detected.
    pub async fn flush(&self) {
        let current = self.snapshot();
        if !self.persists_in_background() {
            if *self.persisted.borrow() != current {
                self.persist_now();
            }
            return;
        }

        let mut persisted = self.persisted.subscribe();
        let _ = persisted.wait_for(|p| *p == current).await;
    }

    /// Whether changes are written by a running background task.
    pub fn persists_in_background(&self) -> bool {
        matches!(&self.mode, PersistMode::Background(task) if !task.is_finished())
    }

    /// Apply `f` and notify subscribers if the state changed.
    fn apply(&self, f: impl FnOnce(&mut StoredSession)) -> bool {
        self.state.send_if_modified(|state| {
            let before = state.clone();
            f(state);
            *state != before
        })
    }

    fn mutate(&self, f: impl FnOnce(&mut StoredSession)) -> bool {
        let changed = self.apply(f);
        if changed && !self.persists_in_background() {
            self.persist_now();
        }
        changed
    }

    fn persist_now(&self) {
        write_latest(
            &self.write_lock,
            || self.snapshot(),
            &self.persistence,
            &self.persisted,
        );
    }
}

/// Write each new state to storage until the store is dropped.
async fn run_persister(
    mut changes: watch::Receiver<StoredSession>,
    persistence: SessionPersistence,
    persisted: Arc<watch::Sender<StoredSession>>,
    write_lock: Arc<Mutex<()>>,
) {
    while changes.changed().await.is_ok() {
        write_latest(
            &write_lock,
            || changes.borrow_and_update().clone(),
            &persistence,
            &persisted,
        );
    }
    tracing::debug!("Session persistence task stopped");
}

/// Write the newest state under `lock` and record it as persisted.
///
/// `latest` runs after the lock is taken, never before.
fn write_latest(
    lock: &Mutex<()>,
    latest: impl FnOnce() -> StoredSession,
    persistence: &SessionPersistence,
    persisted: &watch::Sender<StoredSession>,
) {
    let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
    let snapshot = latest();
    persistence.write(&snapshot);
    persisted.send_replace(snapshot);
}
