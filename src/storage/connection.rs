//! Database connection management
//!
//! Opens or creates the database file, applies pragmas and brings the
//! schema current. The schema carries a single version stamped in
//! `PRAGMA user_version`; any older on-disk version is migrated
//! destructively (drop and recreate, no data preservation).

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Database file name under the default data directory.
pub const DATABASE_NAME: &str = "transfers.db";

const SCHEMA_VERSION: i32 = 1;

/// Default database location for hosts that do not care where the file
/// lives: `<platform data dir>/ftstore/transfers.db`.
pub fn default_db_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("ftstore").join(DATABASE_NAME))
}

/// Open or create the database at `db_path` and bring the schema current.
pub fn open_database(db_path: &str) -> Result<Connection> {
    let db_dir = Path::new(db_path)
        .parent()
        .ok_or_else(|| StoreError::InvalidPath("Invalid database path".into()))?;

    if !db_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(db_dir).map_err(StoreError::Io)?;
    }

    let conn = Connection::open(db_path).map_err(StoreError::Database)?;

    // Enable WAL mode for better concurrent access
    conn.pragma_update(None, "journal_mode", WAL)?;

    // Optimize for performance
    conn.pragma_update(None, "synchronous", NORMAL)?;

    ensure_schema(&conn)?;

    tracing::info!("Database initialized at: {}", db_path);

    Ok(conn)
}

/// Volatile database with the current schema, for tests and ephemeral
/// hosts.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(StoreError::Database)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the transfers table, dropping any older schema version first.
pub(crate) fn ensure_schema(conn: &Connection) -> Result<()> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    if version > 0 {
        tracing::info!(
            "Migrating schema from version {} to {} (drop and recreate)",
            version,
            SCHEMA_VERSION
        );
    }

    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS transfers;

        CREATE TABLE transfers (
            id          INTEGER PRIMARY KEY,
            session_id  TEXT,
            contact     TEXT,
            name        TEXT,
            mime_type   TEXT,
            status      INTEGER,
            direction   INTEGER,
            timestamp   INTEGER,
            size        INTEGER,
            total_size  INTEGER
        );
    "#,
    )?;

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

    tracing::debug!("Created transfers table (schema version {})", SCHEMA_VERSION);
    Ok(())
}

// SQL pragma constants
const WAL: &str = "WAL";
const NORMAL: &str = "NORMAL";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_file_and_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(DATABASE_NAME);
        let conn = open_database(path.to_str().unwrap()).unwrap();
        drop(conn);
        assert!(path.exists());
    }

    #[test]
    fn reopen_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATABASE_NAME);
        let db_path = path.to_str().unwrap();
        {
            let conn = open_database(db_path).unwrap();
            conn.execute("INSERT INTO transfers (id, name) VALUES (1, 'a.png')", [])
                .unwrap();
        }

        let conn = open_database(db_path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM transfers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn stale_schema_is_dropped_and_recreated() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE transfers (id INTEGER PRIMARY KEY, junk TEXT);")
            .unwrap();
        conn.execute("INSERT INTO transfers (id, junk) VALUES (1, 'old')", [])
            .unwrap();

        ensure_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM transfers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        // The recreated table carries the current columns
        conn.execute("INSERT INTO transfers (id, session_id) VALUES (1, 's1')", [])
            .unwrap();
    }

    #[test]
    fn current_schema_is_left_alone() {
        let conn = open_in_memory().unwrap();
        conn.execute("INSERT INTO transfers (id) VALUES (42)", [])
            .unwrap();

        ensure_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM transfers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
