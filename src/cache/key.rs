//! Cache key generation.

use crate::protocol::GenerationParams;
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque cache identity for one generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// How a generation is mapped to a cache key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheKeyStrategy {
    /// `system_prompt + prompt`, byte for byte. Model and parameters are not
    /// part of the key, so changing either reuses earlier answers.
    #[default]
    Concatenated,
    /// SHA-256 over length-prefixed model, merged parameters, system prompt
    /// and prompt.
    Namespaced,
}

impl CacheKeyStrategy {
    pub fn key(
        &self,
        model: &str,
        params: &GenerationParams,
        system_prompt: &str,
        prompt: &str,
    ) -> CacheKey {
        match self {
            CacheKeyStrategy::Concatenated => {
                let mut key = String::with_capacity(system_prompt.len() + prompt.len());
                key.push_str(system_prompt);
                key.push_str(prompt);
                CacheKey(key)
            }
            CacheKeyStrategy::Namespaced => {
                // serde_json::Map is ordered, so the encoding is stable.
                let params = serde_json::to_string(params).unwrap_or_default();
                let mut hasher = Sha256::new();
                for part in [model, params.as_str(), system_prompt, prompt] {
                    hasher.update((part.len() as u64).to_le_bytes());
                    hasher.update(part.as_bytes());
                }
                CacheKey(format!("{:x}", hasher.finalize()))
            }
        }
    }
}
