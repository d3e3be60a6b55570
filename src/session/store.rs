// Session persistence in a SQLite key/value table
//
// The web client kept the token pair and the cached user summary in browser
// localStorage under fixed keys. This is the same contract over SQLite: one
// `session_kv` table, string keys, string values.

use anyhow::{anyhow, Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Short-lived bearer token sent as `Authorization: Bearer ...`.
pub const ACCESS_KEY: &str = "access";
/// Long-lived token exchanged for a new access token on `POST /refresh/`.
pub const REFRESH_KEY: &str = "refresh";
/// Serialized [`UserSummary`](super::UserSummary) of the signed-in user.
pub const ME_KEY: &str = "me";

/// Persisted key/value storage for session state.
///
/// Operations are synchronous: values are tiny and both implementations
/// serialize internally, so no async indirection is worth the complexity.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// SQLite-backed store. Survives process restarts, which is what lets a
/// signed-in session resume without another login.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    /// Open the session database, creating the file and its parent
    /// directory on first use.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create session directory: {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open session database: {}", path.display()))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session_kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .context("Failed to create session_kv table")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Session database lock poisoned"))
    }
}

impl SessionStore for SqliteSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM session_kv WHERE key = ?",
            [key],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("Failed to read '{key}' from session database"))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO session_kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )
        .with_context(|| format!("Failed to write '{key}' to session database"))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM session_kv WHERE key = ?", [key])
            .with_context(|| format!("Failed to delete '{key}' from session database"))?;
        Ok(())
    }
}

/// In-memory store for ephemeral sessions (`--session-file :memory:`) and
/// for tests.
#[derive(Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Session store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Session store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Session store lock poisoned"))?;
        values.remove(key);
        Ok(())
    }
}
