//! On-disk cache backed by a single SQLite file.

use super::backend::CacheBackend;
use super::key::CacheKey;
use crate::Result;
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

const SCHEMA: &str = "create table if not exists cache (
    key text primary key,
    value text not null,
    created_at integer not null
)";

/// Persistent cache that survives process restarts.
///
/// One writer per file is assumed; two engines pointing at the same path from
/// different processes may interleave writes.
pub struct SqliteCache {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteCache {
    /// Open (or create) the store at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute(SCHEMA, [])?;
        debug!(path = %path.display(), "opened response cache");
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// File backing this store, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

impl CacheBackend for SqliteCache {
    fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "select value from cache where key = ?1",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &CacheKey, value: &str) -> Result<()> {
        self.conn().execute(
            "insert or replace into cache(key, value, created_at) values (?1, ?2, ?3)",
            (key.as_str(), value, now_secs()),
        )?;
        Ok(())
    }

    fn delete(&self, key: &CacheKey) -> Result<bool> {
        let n = self
            .conn()
            .execute("delete from cache where key = ?1", [key.as_str()])?;
        Ok(n > 0)
    }

    fn exists(&self, key: &CacheKey) -> Result<bool> {
        let found: Option<i64> = self
            .conn()
            .query_row(
                "select 1 from cache where key = ?1",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn clear(&self) -> Result<()> {
        self.conn().execute("delete from cache", [])?;
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        let n: i64 = self
            .conn()
            .query_row("select count(*) from cache", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
