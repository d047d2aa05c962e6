//! Best-effort key/value caches for fetched catalog records.
//!
//! A cache miss, a stale entry or a backend failure is never fatal: the
//! loader logs it and falls back to an explicit fetch.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::catalog::RawCity;
use crate::error::{CatalogError, Result};

/// Fixed key under which the fetched catalog is stored.
pub const CACHE_KEY: &str = "cities";

/// Storage for raw catalog records keyed by name.
pub trait CatalogCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<RawCity>>>;
    fn put(&self, key: &str, records: &[RawCity]) -> Result<()>;
    fn clear(&self, key: &str) -> Result<()>;
}

fn poisoned<T>(_: T) -> CatalogError {
    CatalogError::Cache("cache lock poisoned".to_string())
}

// ============================================================================
// In-memory
// ============================================================================

/// Process-local cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<RawCity>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Vec<RawCity>>> {
        Ok(self.entries.lock().map_err(poisoned)?.get(key).cloned())
    }

    fn put(&self, key: &str, records: &[RawCity]) -> Result<()> {
        self.entries
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), records.to_vec());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.entries.lock().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

// ============================================================================
// JSON files
// ============================================================================

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(err: std::io::Error) -> CatalogError {
    CatalogError::Cache(err.to_string())
}

impl CatalogCache for JsonFileCache {
    fn get(&self, key: &str) -> Result<Option<Vec<RawCity>>> {
        let text = match fs::read_to_string(self.path_for(key)) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| CatalogError::Cache(format!("corrupt cache entry '{key}': {e}")))
    }

    fn put(&self, key: &str, records: &[RawCity]) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(io_error)?;
        let json =
            serde_json::to_string(records).map_err(|e| CatalogError::Cache(e.to_string()))?;
        fs::write(self.path_for(key), json).map_err(io_error)
    }

    fn clear(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(io_error(e)),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// SQLite
// ============================================================================

#[cfg(feature = "persistence")]
pub use sqlite::SqliteCache;

#[cfg(feature = "persistence")]
mod sqlite {
    use std::path::Path;
    use std::sync::Mutex;

    use rusqlite::{params, Connection, OptionalExtension};

    use super::{poisoned, CatalogCache};
    use crate::catalog::RawCity;
    use crate::error::{CatalogError, Result};

    fn db_error(err: rusqlite::Error) -> CatalogError {
        CatalogError::Cache(err.to_string())
    }

    /// Cache stored in a single SQLite table.
    pub struct SqliteCache {
        conn: Mutex<Connection>,
    }

    impl SqliteCache {
        /// Open (or create) a cache database at `path`.
        pub fn open(path: impl AsRef<Path>) -> Result<Self> {
            Self::with_connection(Connection::open(path).map_err(db_error)?)
        }

        /// A cache that lives only as long as this value.
        pub fn in_memory() -> Result<Self> {
            Self::with_connection(Connection::open_in_memory().map_err(db_error)?)
        }

        fn with_connection(conn: Connection) -> Result<Self> {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS catalog_cache (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                )",
                [],
            )
            .map_err(db_error)?;
            Ok(Self {
                conn: Mutex::new(conn),
            })
        }
    }

    impl CatalogCache for SqliteCache {
        fn get(&self, key: &str) -> Result<Option<Vec<RawCity>>> {
            let conn = self.conn.lock().map_err(poisoned)?;
            let value: Option<String> = conn
                .query_row(
                    "SELECT value FROM catalog_cache WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()
                .map_err(db_error)?;

            match value {
                Some(json) => serde_json::from_str(&json)
                    .map(Some)
                    .map_err(|e| CatalogError::Cache(format!("corrupt cache entry '{key}': {e}"))),
                None => Ok(None),
            }
        }

        fn put(&self, key: &str, records: &[RawCity]) -> Result<()> {
            let json =
                serde_json::to_string(records).map_err(|e| CatalogError::Cache(e.to_string()))?;
            let conn = self.conn.lock().map_err(poisoned)?;
            conn.execute(
                "INSERT OR REPLACE INTO catalog_cache (key, value) VALUES (?1, ?2)",
                params![key, json],
            )
            .map_err(db_error)?;
            Ok(())
        }

        fn clear(&self, key: &str) -> Result<()> {
            let conn = self.conn.lock().map_err(poisoned)?;
            conn.execute("DELETE FROM catalog_cache WHERE key = ?1", params![key])
                .map_err(db_error)?;
            Ok(())
        }
    }
}
