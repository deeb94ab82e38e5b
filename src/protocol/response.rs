//! Chat-completion response parsing.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
    /// OpenRouter reports some upstream failures as a 2xx body with an `error` object.
    #[serde(default)]
    pub error: Option<ProviderError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderError {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Text and usage extracted from a successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Parse a 2xx body and extract `choices[0].message.content`.
    pub fn parse(status: u16, body: &str) -> Result<Completion> {
        let parsed: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
            Error::malformed_with_context(
                "response body is not a chat completion object",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("response_parser"),
            )
        })?;
        parsed.into_completion(status, body)
    }

    fn into_completion(self, status: u16, body: &str) -> Result<Completion> {
        if self.choices.is_empty() {
            if let Some(err) = self.error {
                let status = err
                    .code
                    .as_ref()
                    .and_then(|c| c.as_u64())
                    .and_then(|c| u16::try_from(c).ok())
                    .unwrap_or(status);
                return Err(Error::Remote {
                    status,
                    message: err
                        .message
                        .unwrap_or_else(|| "provider returned an error object".to_string()),
                    body: body.to_string(),
                });
            }
        }

        let usage = self.usage;
        let text = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| {
                Error::malformed_with_context(
                    "missing completion text",
                    ErrorContext::new()
                        .with_field_path("choices[0].message.content")
                        .with_source("response_parser"),
                )
            })?;

        Ok(Completion { text, usage })
    }
}
