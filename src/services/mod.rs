// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod chat;
pub mod session_store;

pub use chat::{ChatClient, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use session_store::SessionStore;
