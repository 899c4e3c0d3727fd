//! Response cache for deterministic LLM calls.
//!
//! A single SQLite file keyed by SHA-256 of the canonical request payload.
//! The stored value is the raw response JSON; the API key is never part of
//! the key or the row.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::Result;

/// Thread-safe SQLite-backed cache. Writes are serialised through the
/// connection lock; `INSERT OR REPLACE` makes repeated stores idempotent.
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Open (or create) the cache file, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path.as_ref())?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS cache (key TEXT PRIMARY KEY, value TEXT, created_at REAL)",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let conn = self.conn.lock().unwrap();
        let row: Option<String> = conn
            .query_row("SELECT value FROM cache WHERE key = ?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;

        match row {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    pub fn set(&self, key: &str, value: &Value) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO cache (key, value, created_at) VALUES (?1, ?2, ?3)",
            params![
                key,
                serde_json::to_string(value)?,
                chrono::Utc::now().timestamp_millis() as f64 / 1000.0
            ],
        )?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM cache", [], |r| r.get(0))?;
        Ok(n as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Cache key: SHA-256 over the serialized payload. serde_json `Value`
/// objects iterate keys in sorted order, so the serialization is stable.
pub fn cache_key(payload: &Value) -> String {
    let blob = payload.to_string();
    let digest = Sha256::digest(blob.as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_get_set_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let cache = SqliteCache::open(dir.path().join("cache.sqlite"))?;

        assert!(cache.is_empty()?);
        assert_eq!(cache.get("missing")?, None);

        let value = json!({"output": [{"type": "message"}], "id": "resp_1"});
        cache.set("k1", &value)?;
        assert_eq!(cache.get("k1")?, Some(value.clone()));

        // Overwrite is idempotent
        cache.set("k1", &value)?;
        assert_eq!(cache.len()?, 1);
        Ok(())
    }

    #[test]
    fn test_cache_survives_reopen() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cache.sqlite");

        {
            let cache = SqliteCache::open(&path)?;
            cache.set("k", &json!({"v": 1}))?;
        }
        let cache = SqliteCache::open(&path)?;
        assert_eq!(cache.get("k")?, Some(json!({"v": 1})));
        Ok(())
    }

    #[test]
    fn test_cache_key_is_stable_and_sensitive() {
        let a = json!({"model": "m", "temperature": 0.0, "input": ["x"]});
        let b = json!({"temperature": 0.0, "input": ["x"], "model": "m"});
        let c = json!({"model": "m", "temperature": 0.3, "input": ["x"]});

        // Key order does not matter, parameter values do
        assert_eq!(cache_key(&a), cache_key(&b));
        assert_ne!(cache_key(&a), cache_key(&c));
        assert_eq!(cache_key(&a).len(), 64);
    }
}
