// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! WheelLoop: persisted Strava session and chat settings.
//!
//! This crate keeps the signed-in athlete's Strava tokens and profile,
//! together with the chat completion settings used to write activity
//! commentary, in one JSON aggregate mirrored to local storage.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

use config::{Config, StorageKind};
use db::{FileStorage, MemoryStorage, SessionPersistence};
use error::AppError;
use services::{ChatClient, ChatCompletionRequest, SessionStore};
use std::sync::Arc;

/// Shared application state, built once at startup and passed by reference.
pub struct AppState {
    pub config: Config,
    pub store: SessionStore,
}

impl AppState {
    /// Build state with the storage backend selected by `config`.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let persistence = match config.storage {
            StorageKind::File => {
                SessionPersistence::new(Arc::new(FileStorage::open(config.storage_dir.clone())?))
            }
            StorageKind::Memory => SessionPersistence::new(Arc::new(MemoryStorage::new())),
            StorageKind::None => SessionPersistence::unavailable(),
        };
        Ok(Self::with_persistence(config, persistence))
    }

    /// Build state on an explicit persistence slot.
    pub fn with_persistence(config: Config, persistence: SessionPersistence) -> Self {
        Self {
            store: SessionStore::new(persistence),
            config,
        }
    }

    /// Chat client for the current wheel settings.
    pub fn chat_client(&self) -> Result<ChatClient, AppError> {
        ChatClient::from_wheel_settings(&self.store.wheel_settings())
    }

    /// Ask the configured model for commentary on `prompt`.
    pub async fn commentary(&self, prompt: &str) -> Result<String, AppError> {
        let settings = self.store.wheel_settings();
        let client = ChatClient::from_wheel_settings(&settings)?;
        let request = ChatCompletionRequest::from_wheel_settings(&settings, prompt)
            .with_temperature(self.config.chat_temperature);

        let response = client.create_chat_completion(&request).await?;
        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| AppError::ChatApi("Response contained no content".to_string()))
    }
}
