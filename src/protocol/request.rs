//! Chat-completion request payload and generation parameters.

use crate::types::message::Message;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TOP_P: f64 = 1.0;

/// Sampling controls merged from engine defaults and per-call overrides.
///
/// Unset fields do not override anything. `extra` carries provider-specific
/// keys (e.g. `seed`, `stop`, `frequency_penalty`) passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenerationParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine defaults: temperature 0.7, max_tokens 1024, top_p 1.0.
    pub fn defaults() -> Self {
        Self {
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            top_p: Some(DEFAULT_TOP_P),
            extra: Map::new(),
        }
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set an arbitrary parameter. The three typed keys are routed to their
    /// fields so a key never appears twice in the payload.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        let typed = match key.as_str() {
            "temperature" if value.is_number() => {
                self.temperature = value.as_f64();
                true
            }
            "top_p" if value.is_number() => {
                self.top_p = value.as_f64();
                true
            }
            "max_tokens" if value.is_u64() => {
                self.max_tokens = value.as_u64().map(|v| v.min(u32::MAX as u64) as u32);
                true
            }
            _ => false,
        };
        if !typed {
            self.extra.insert(key, value);
        }
        self
    }

    /// `self` overridden key-by-key by every field set in `overrides`.
    pub fn merged(&self, overrides: &GenerationParams) -> GenerationParams {
        let mut out = self.clone();
        if overrides.temperature.is_some() {
            out.temperature = overrides.temperature;
        }
        if overrides.max_tokens.is_some() {
            out.max_tokens = overrides.max_tokens;
        }
        if overrides.top_p.is_some() {
            out.top_p = overrides.top_p;
        }
        for (k, v) in &overrides.extra {
            out.extra.insert(k.clone(), v.clone());
        }
        out
    }

    fn write_into(&self, body: &mut Map<String, Value>) {
        if let Some(t) = self.temperature {
            body.insert("temperature".into(), Value::from(t));
        }
        if let Some(m) = self.max_tokens {
            body.insert("max_tokens".into(), Value::from(m));
        }
        if let Some(p) = self.top_p {
            body.insert("top_p".into(), Value::from(p));
        }
        for (k, v) in &self.extra {
            body.insert(k.clone(), v.clone());
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub params: GenerationParams,
}

impl ChatCompletionRequest {
    /// Ordered `[system, user]` exchange.
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        prompt: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::system(system_prompt), Message::user(prompt)],
            params,
        }
    }

    /// Wire JSON. Parameters are written after `model` and `messages`, so an
    /// extra key with the same name replaces them.
    pub fn to_json(&self) -> crate::Result<Value> {
        let mut body = Map::new();
        body.insert("model".into(), Value::String(self.model.clone()));
        body.insert("messages".into(), serde_json::to_value(&self.messages)?);
        self.params.write_into(&mut body);
        Ok(Value::Object(body))
    }
}
