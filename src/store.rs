//! SQLite persistence for parsed log records
//!
//! [`LogStore`] owns the connection. It is opened per command, passed by reference to
//! whoever needs it and released either by [`LogStore::close`] or by dropping it, so the
//! connection never outlives the call that opened it, whichever way that call exits.

use crate::error::StoreError;
use crate::models::LogRecord;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS logs (
        Date TEXT NOT NULL,
        Time TEXT NOT NULL,
        Level TEXT NOT NULL,
        Message TEXT NOT NULL,
        "Random Number" INTEGER NOT NULL
    )
"#;

const INSERT_SQL: &str = r#"
    INSERT INTO logs (Date, Time, Level, Message, "Random Number")
    VALUES (?1, ?2, ?3, ?4, ?5)
"#;

const SELECT_SQL: &str = r#"SELECT Date, Time, Level, Message, "Random Number" FROM logs"#;

pub struct LogStore {
    conn: Connection,
    path: PathBuf,
}

impl LogStore {
    /// Open (or create) the database at `path` and make sure the `logs` table exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Opened database");
        Self::with_connection(conn, path.to_path_buf())
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::with_connection(conn, PathBuf::from(":memory:"))
    }

    fn with_connection(conn: Connection, path: PathBuf) -> Result<Self, StoreError> {
        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(StoreError::Schema)?;
        Ok(Self { conn, path })
    }

    /// Write all records in one transaction. Either every row lands or none does.
    pub fn insert_batch(&mut self, records: &[LogRecord]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction().map_err(StoreError::Insert)?;
        {
            let mut stmt = tx.prepare_cached(INSERT_SQL).map_err(StoreError::Insert)?;
            for record in records {
                stmt.execute(params![
                    record.date,
                    record.time,
                    record.level,
                    record.message,
                    record.number,
                ])
                .map_err(StoreError::Insert)?;
            }
        }
        tx.commit().map_err(StoreError::Insert)?;

        info!(rows = records.len(), database = %self.path.display(), "Inserted log records");
        Ok(records.len())
    }

    /// Every stored row, in insertion order.
    pub fn fetch_all(&self) -> Result<Vec<LogRecord>, StoreError> {
        let mut stmt = self.conn.prepare_cached(SELECT_SQL).map_err(StoreError::Query)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(LogRecord {
                    date: row.get(0)?,
                    time: row.get(1)?,
                    level: row.get(2)?,
                    message: row.get(3)?,
                    number: row.get(4)?,
                })
            })
            .map_err(StoreError::Query)?;

        let records = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::Query)?;
        debug!(rows = records.len(), "Fetched log records");
        Ok(records)
    }

    /// Close the connection, surfacing any error the implicit close on drop would swallow.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn
            .close()
            .map_err(|(_conn, source)| StoreError::Close(source))
    }
}
