// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Storage failures never reach callers of the session store (they are
//! logged and swallowed there), but the storage backends and the chat
//! client report them through [`AppError`].

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Chat API error: {0}")]
    ChatApi(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub const CHAT_RATE_LIMIT: &'static str = "Rate limit exceeded";
    pub const CHAT_TOKEN_ERROR: &'static str = "Invalid or expired API key";

    /// Whether this is a chat API rejection of the configured API key.
    pub fn is_chat_auth_error(&self) -> bool {
        matches!(self, AppError::ChatApi(msg) if msg == Self::CHAT_TOKEN_ERROR)
    }

    /// Whether this is a chat API rate limit response.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::ChatApi(msg) if msg == Self::CHAT_RATE_LIMIT)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
