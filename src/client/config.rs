//! Engine configuration, defaults, and cache-path derivation.

use crate::protocol::GenerationParams;
use crate::{Error, ErrorContext, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, creative, and smart assistant.";
pub const DEFAULT_SITE_URL: &str = "https://example.com";
pub const DEFAULT_SITE_NAME: &str = "TextGrad App";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable consulted when no API key is given explicitly.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Directory under the platform cache dir that holds the cache files.
pub const DEFAULT_APP_NAME: &str = "textgrad";
/// Provider tag embedded in cache file names.
pub const DEFAULT_CACHE_PROVIDER: &str = "deepseek";

/// Headers identifying the calling application to OpenRouter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingMetadata {
    /// Sent as `HTTP-Referer`.
    pub site_url: String,
    /// Sent as `X-Title`.
    pub site_name: String,
}

impl Default for RoutingMetadata {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
        }
    }
}

/// Immutable engine configuration.
#[derive(Clone)]
pub struct EngineConfig {
    pub model: String,
    pub system_prompt: String,
    pub(crate) api_key: String,
    pub routing: RoutingMetadata,
    pub defaults: GenerationParams,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("api_key", &"<redacted>")
            .field("routing", &self.routing)
            .field("defaults", &self.defaults)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl EngineConfig {
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Headers for every outbound request, in send order.
    pub fn headers(&self, request_id: &str) -> Vec<(String, String)> {
        vec![
            ("Authorization".into(), format!("Bearer {}", self.api_key)),
            ("Content-Type".into(), "application/json".into()),
            ("HTTP-Referer".into(), self.routing.site_url.clone()),
            ("X-Title".into(), self.routing.site_name.clone()),
            ("x-request-id".into(), request_id.to_string()),
        ]
    }
}

/// Explicit key first, then `OPENROUTER_API_KEY` via `env`. Empty values count as unset.
pub fn resolve_api_key(
    explicit: Option<&str>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<String> {
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    env(API_KEY_ENV).filter(|k| !k.is_empty()).ok_or_else(|| {
        Error::configuration_with_context(
            "OpenRouter API key is required. Please provide api_key or set the OPENROUTER_API_KEY environment variable.",
            ErrorContext::new()
                .with_field_path("api_key")
                .with_source("engine_builder"),
        )
    })
}

pub(crate) fn validate_base_url(base_url: &str) -> Result<()> {
    let url = url::Url::parse(base_url).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid base URL '{}'", base_url),
            ErrorContext::new()
                .with_field_path("base_url")
                .with_details(e.to_string())
                .with_source("engine_builder"),
        )
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::configuration_with_context(
            format!("base URL must be http(s), got '{}'", url.scheme()),
            ErrorContext::new()
                .with_field_path("base_url")
                .with_source("engine_builder"),
        ));
    }
    Ok(())
}

/// `cache_<provider>_<model>.db` with path separators in the model replaced by `_`.
pub fn cache_file_name(provider: &str, model: &str) -> String {
    let model: String = model
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("cache_{}_{}.db", provider, model)
}

/// `<platform cache dir>/<app_name>`, falling back to the temp dir when the
/// platform has no cache dir.
pub fn app_cache_dir(app_name: &str) -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(app_name)
}

pub fn cache_path(dir: &Path, provider: &str, model: &str) -> PathBuf {
    dir.join(cache_file_name(provider, model))
}
