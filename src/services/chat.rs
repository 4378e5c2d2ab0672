// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OpenAI-compatible chat completion client.
//!
//! Driven by the user's [`WheelSettings`]: the base URL and API key select
//! the endpoint, the model and system prompt shape each request.

use crate::error::AppError;
use crate::models::WheelSettings;
use serde::{Deserialize, Serialize};

/// Endpoint used when the settings leave the base URL empty.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat completion API client.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ChatClient {
    /// Create a client. An empty `base_url` selects [`DEFAULT_BASE_URL`].
    pub fn new(api_key: &str, base_url: Option<&str>) -> Result<Self, AppError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::BadRequest("Chat API key is not set".to_string()));
        }

        let base_url = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn from_wheel_settings(settings: &WheelSettings) -> Result<Self, AppError> {
        Self::new(&settings.api_key, Some(settings.base_url.as_str()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send a chat completion request.
    pub async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, AppError> {
        if request.model.is_empty() {
            return Err(AppError::BadRequest("Chat model is not set".to_string()));
        }

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::ChatApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Chat API rate limit hit (429)");
                return Err(AppError::ChatApi(AppError::CHAT_RATE_LIMIT.to_string()));
            }

            if status.as_u16() == 401 {
                return Err(AppError::ChatApi(AppError::CHAT_TOKEN_ERROR.to_string()));
            }

            return Err(AppError::ChatApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ChatApi(format!("JSON parse error: {}", e)))
    }
}

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// Request for `prompt` using the configured model and system prompt.
    ///
    /// An empty system prompt is left out of the message list.
    pub fn from_wheel_settings(settings: &WheelSettings, prompt: impl Into<String>) -> Self {
        let mut messages = Vec::with_capacity(2);
        if !settings.system_prompt.trim().is_empty() {
            messages.push(ChatMessage::system(settings.system_prompt.clone()));
        }
        messages.push(ChatMessage::user(prompt));

        Self {
            model: settings.model.clone(),
            temperature: None,
            messages,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Response to a chat completion request (fields we use).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    pub role: ChatRole,
    /// Null when the model answered with tool calls only.
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> WheelSettings {
        WheelSettings {
            model: "gpt-4o-mini".to_string(),
            base_url: "http://localhost:11434/v1/".to_string(),
            api_key: "sk-test".to_string(),
            system_prompt: "Roast this ride.".to_string(),
        }
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = ChatClient::new("  ", None).err().unwrap();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_empty_base_url_uses_default() {
        let client = ChatClient::new("sk-test", Some("")).unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(
            client.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_from_wheel_settings_trims_trailing_slash() {
        let client = ChatClient::from_wheel_settings(&settings()).unwrap();
        assert_eq!(
            client.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_includes_system_prompt() {
        let request = ChatCompletionRequest::from_wheel_settings(&settings(), "40km, 600m");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    { "role": "system", "content": "Roast this ride." },
                    { "role": "user", "content": "40km, 600m" }
                ]
            })
        );
    }

    #[test]
    fn test_request_skips_empty_system_prompt() {
        let mut settings = settings();
        settings.system_prompt = String::new();
        let request =
            ChatCompletionRequest::from_wheel_settings(&settings, "hi").with_temperature(0.5);

        assert_eq!(request.messages, vec![ChatMessage::user("hi")]);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["temperature"], json!(0.5));
    }

    #[test]
    fn test_response_first_content() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "Nice ride." },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 5, "completion_tokens": 3, "total_tokens": 8 }
        }))
        .unwrap();

        assert_eq!(response.first_content(), Some("Nice ride."));
        assert_eq!(response.choices[0].message.role, ChatRole::Assistant);
    }

    #[test]
    fn test_response_without_choices() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.first_content().is_none());
    }

    #[tokio::test]
    async fn test_empty_model_rejected_before_request() {
        let client = ChatClient::new("sk-test", Some("http://127.0.0.1:9")).unwrap();
        let request = ChatCompletionRequest {
            model: String::new(),
            temperature: None,
            messages: vec![ChatMessage::user("hi")],
        };

        let err = client.create_chat_completion(&request).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
