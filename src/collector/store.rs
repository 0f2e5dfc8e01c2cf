// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Chat message database and raw packet dump

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection};
use serde_json::Value;

use super::chat::ChatMessage;
use crate::error::{ErrorContext, Result};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS chat_messages (
    id TEXT PRIMARY KEY,
    videoId TEXT NOT NULL,
    authorName TEXT NOT NULL,
    authorChannelId TEXT NOT NULL,
    text TEXT NOT NULL,
    timestamp INTEGER NOT NULL
)";

/// Row read back from the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: String,
    pub video_id: String,
    pub author_name: String,
    pub author_channel_id: String,
    pub text: String,
    pub timestamp: i64,
}

/// SQLite-backed chat message store
pub struct ChatStore {
    conn: Mutex<Connection>,
}

impl ChatStore {
    /// Open (or create) the database file and its table
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .context(&format!("open chat database {}", path.display()))?;
        Self::with_connection(conn)
    }

    /// Store living only in memory
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(CREATE_TABLE, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert a message, returns false if its id was already stored
    pub fn insert(&self, video_id: &str, message: &ChatMessage) -> Result<bool> {
        let changed = self.conn.lock().execute(
            "INSERT OR IGNORE INTO chat_messages
                (id, videoId, authorName, authorChannelId, text, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                message.id,
                video_id,
                message.author_name,
                message.author_external_channel_id,
                message.text,
                message.timestamp_ms(),
            ],
        )?;
        Ok(changed > 0)
    }

    /// Number of stored messages
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM chat_messages", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Messages stored for a video, oldest first
    pub fn messages_for(&self, video_id: &str) -> Result<Vec<StoredMessage>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, videoId, authorName, authorChannelId, text, timestamp
             FROM chat_messages WHERE videoId = ?1 ORDER BY timestamp, id",
        )?;
        let rows = stmt.query_map(params![video_id], |row| {
            Ok(StoredMessage {
                id: row.get(0)?,
                video_id: row.get(1)?,
                author_name: row.get(2)?,
                author_channel_id: row.get(3)?,
                text: row.get(4)?,
                timestamp: row.get(5)?,
            })
        })?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }
}

/// Newline-delimited dump of every raw payload received
pub struct PacketLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl PacketLog {
    /// Create the dump file, truncating what a previous run left
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .context(&format!("create packet dump {}", path.display()))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one payload as a single line
    pub fn append(&self, data: &Value) -> Result<()> {
        let mut line = serde_json::to_vec(data)?;
        line.push(b'\n');

        let mut file = self.file.lock();
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }
}
