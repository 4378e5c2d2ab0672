// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat completion settings used to generate activity commentary.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User-supplied chat completion configuration.
///
/// Every field defaults to an empty string. Values are never validated.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WheelSettings {
    pub model: String,
    pub base_url: String,
    pub api_key: String,
    pub system_prompt: String,
}

impl WheelSettings {
    /// Shallow merge: fields set in `patch` overwrite, the rest are kept.
    pub fn apply(&mut self, patch: WheelSettingsPatch) {
        let WheelSettingsPatch {
            model,
            base_url,
            api_key,
            system_prompt,
        } = patch;

        if let Some(model) = model {
            self.model = model;
        }
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(api_key) = api_key {
            self.api_key = api_key;
        }
        if let Some(system_prompt) = system_prompt {
            self.system_prompt = system_prompt;
        }
    }

    /// Build settings from an untrusted stored value.
    ///
    /// Anything other than an object yields defaults. Inside an object,
    /// each field is taken only when it holds a string.
    pub fn from_stored(value: Option<&Value>) -> Self {
        let Some(Value::Object(obj)) = value else {
            return Self::default();
        };

        let field = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default()
        };

        Self {
            model: field("model"),
            base_url: field("baseUrl"),
            api_key: field("apiKey"),
            system_prompt: field("systemPrompt"),
        }
    }

    /// API key with all but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

impl fmt::Debug for WheelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WheelSettings")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

/// Partial update for [`WheelSettings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelSettingsPatch {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub system_prompt: Option<String>,
}

impl WheelSettingsPatch {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
