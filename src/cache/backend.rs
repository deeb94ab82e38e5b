//! Cache backend implementations.

use super::key::CacheKey;
use crate::Result;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Key/value store for generated text. Entries never expire.
pub trait CacheBackend: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<Option<String>>;
    fn set(&self, key: &CacheKey, value: &str) -> Result<()>;
    fn delete(&self, key: &CacheKey) -> Result<bool>;
    fn exists(&self, key: &CacheKey) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
    fn clear(&self) -> Result<()>;
    fn len(&self) -> Result<usize>;
    fn name(&self) -> &'static str;
}

/// Process-local cache. Lost when the process exits.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheBackend for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        Ok(self.read().get(key.as_str()).cloned())
    }
    fn set(&self, key: &CacheKey, value: &str) -> Result<()> {
        self.write().insert(key.as_str().to_string(), value.to_string());
        Ok(())
    }
    fn delete(&self, key: &CacheKey) -> Result<bool> {
        Ok(self.write().remove(key.as_str()).is_some())
    }
    fn exists(&self, key: &CacheKey) -> Result<bool> {
        Ok(self.read().contains_key(key.as_str()))
    }
    fn clear(&self) -> Result<()> {
        self.write().clear();
        Ok(())
    }
    fn len(&self) -> Result<usize> {
        Ok(self.read().len())
    }
    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Never stores anything; every lookup misses.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for NullCache {
    fn get(&self, _: &CacheKey) -> Result<Option<String>> {
        Ok(None)
    }
    fn set(&self, _: &CacheKey, _: &str) -> Result<()> {
        Ok(())
    }
    fn delete(&self, _: &CacheKey) -> Result<bool> {
        Ok(false)
    }
    fn clear(&self) -> Result<()> {
        Ok(())
    }
    fn len(&self) -> Result<usize> {
        Ok(0)
    }
    fn name(&self) -> &'static str {
        "null"
    }
}
