// Persistence for the user's custom ranking text.
//
// Only the raw text blob is stored. Picks and team count are session state.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

/// Key the ranking text is stored under.
const RANKINGS_KEY: &str = "custom_rankings";

/// The saved text and when it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredText {
    pub text: String,
    pub saved_at: DateTime<Utc>,
}

/// Load/save capability for the ranking text.
pub trait TextStore: Send + Sync {
    /// The last saved text, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<StoredText>>;

    /// Overwrite the saved text.
    fn save(&self, text: &str) -> Result<StoredText>;
}

// ---------------------------------------------------------------------------
// SQLite store
// ---------------------------------------------------------------------------

/// SQLite-backed key-value store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at `path`. Pass `":memory:"` for an
    /// ephemeral database.
    pub fn open(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create directory {}", parent.display())
                    })?;
                }
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS board_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock).
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Persist an arbitrary JSON value under `key`, replacing any previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO board_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM board_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))
            .context("failed to query board state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

impl TextStore for SqliteStore {
    fn load(&self) -> Result<Option<StoredText>> {
        match self.load_state(RANKINGS_KEY)? {
            Some(value) => {
                let stored = serde_json::from_value(value)
                    .context("stored rankings have an unexpected shape")?;
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }

    fn save(&self, text: &str) -> Result<StoredText> {
        let stored = StoredText {
            text: text.to_string(),
            saved_at: Utc::now(),
        };
        let value = serde_json::to_value(&stored).context("failed to serialize rankings")?;
        self.save_state(RANKINGS_KEY, &value)?;
        Ok(stored)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local store for tests and `--no-store` runs.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Option<StoredText>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, Option<StoredText>> {
        self.inner.lock().expect("memory store mutex poisoned")
    }
}

impl TextStore for MemoryStore {
    fn load(&self) -> Result<Option<StoredText>> {
        Ok(self.inner().clone())
    }

    fn save(&self, text: &str) -> Result<StoredText> {
        let stored = StoredText {
            text: text.to_string(),
            saved_at: Utc::now(),
        };
        *self.inner() = Some(stored.clone());
        Ok(stored)
    }
}

/// Default database location inside the platform data directory.
pub fn default_db_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "snakeboard")
        .map(|dirs| dirs.data_dir().join("snakeboard.db"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
