//! 响应缓存模块：按提示词指纹缓存生成结果，避免重复 API 调用。
//!
//! # Response Caching Module
//!
//! Generated text is cached by a fingerprint of the prompt so repeated calls
//! never reach the network. Entries never expire and there is no eviction.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheManager`] | Hit/miss accounting on top of a backend |
//! | [`CacheBackend`] | Trait for implementing custom cache backends |
//! | [`SqliteCache`] | Persistent on-disk store (default) |
//! | [`MemoryCache`] | In-process store |
//! | [`NullCache`] | No-op cache for disabling caching |
//! | [`CacheKeyStrategy`] | Maps a generation to a [`CacheKey`] |
//!
//! ## Example
//!
//! ```rust
//! use openrouter_engine::cache::{CacheBackend, CacheKey, SqliteCache};
//!
//! let cache = SqliteCache::open_in_memory()?;
//! cache.set(&CacheKey::from("You are terse.2+2="), "4")?;
//! assert_eq!(cache.get(&CacheKey::from("You are terse.2+2="))?.as_deref(), Some("4"));
//! # Ok::<(), openrouter_engine::Error>(())
//! ```

mod backend;
mod key;
mod manager;
mod sqlite;

pub use backend::{CacheBackend, MemoryCache, NullCache};
pub use key::{CacheKey, CacheKeyStrategy};
pub use manager::{CacheManager, CacheStats};
pub use sqlite::SqliteCache;
