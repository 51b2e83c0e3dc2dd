//! Transfer record CRUD
//!
//! All operations are addressed by a target URI (see [`crate::address`])
//! and run as single synchronous statements against the store's
//! connection. Every successful mutation emits a [`ChangeEvent`] on the
//! store's broadcast channel, whether or not any row matched.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, ToSql};
use tokio::sync::broadcast;

use crate::address::{Target, TargetKind};
use crate::changes::{ChangeEvent, CHANNEL_CAPACITY};
use crate::error::{Result, StoreError};
use crate::record::{Column, TransferRecord, TransferValues};
use crate::storage::connection;
use crate::storage::idgen::IdGenerator;

/// Store of file-transfer records: one SQLite table behind a mutex-guarded
/// connection, plus the change broadcast channel.
///
/// The store holds no session state between calls; concurrent callers
/// serialize on the connection mutex, and SQLite's WAL mode covers other
/// processes sharing the same file.
pub struct TransferStore {
    conn: Mutex<Connection>,
    ids: IdGenerator,
    changes: broadcast::Sender<ChangeEvent>,
}

impl TransferStore {
    /// Open or create the database at `db_path`.
    pub fn open(db_path: &str) -> Result<Self> {
        Ok(Self::with_connection(connection::open_database(db_path)?))
    }

    /// Volatile store, for tests and ephemeral hosts.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::with_connection(connection::open_in_memory()?))
    }

    fn with_connection(conn: Connection) -> Self {
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            conn: Mutex::new(conn),
            ids: IdGenerator::new(),
            changes,
        }
    }

    /// Subscribe to change events. Every successful mutation sends exactly
    /// one event identifying the affected address.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    /// Explicit teardown. Dropping the store releases the handle too; this
    /// surfaces any error SQLite reports while closing.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| StoreError::State("Poisoned lock".into()))?;
        conn.close().map_err(|(_, e)| StoreError::Database(e))
    }

    /// Insert a new record and return its id.
    ///
    /// Accepts the collection form or the record form (any embedded id is
    /// ignored; the id is always generated here). Absent fields are stored
    /// as NULL, not defaulted. Emits a change event addressed to the new
    /// record's handle.
    pub fn insert(&self, uri: &str, values: &TransferValues) -> Result<i64> {
        match Target::parse(uri) {
            Some(Target::Transfers) | Some(Target::TransferId(_)) => {}
            _ => return Err(StoreError::UnsupportedTarget(uri.to_string())),
        }

        let id = self.ids.next_id();
        let set = values.set_columns();

        let mut sql = String::from("INSERT INTO transfers (id");
        for (col, _) in &set {
            sql.push_str(", ");
            sql.push_str(col.as_str());
        }
        sql.push_str(") VALUES (?");
        for _ in &set {
            sql.push_str(", ?");
        }
        sql.push(')');

        let mut bind: Vec<&dyn ToSql> = Vec::with_capacity(set.len() + 1);
        bind.push(&id);
        bind.extend(set.iter().map(|(_, v)| *v));

        let conn = self.lock_conn()?;
        conn.execute(&sql, bind.as_slice()).map_err(constraint_or_db)?;
        drop(conn);

        tracing::debug!("Inserted transfer record {}", id);
        self.notify(Target::TransferId(id));
        Ok(id)
    }

    /// Query records.
    ///
    /// `projection` restricts the returned columns (the id is always
    /// selected so every row carries its handle; unprojected fields read
    /// back as `None`). `selection` is a boolean SQL fragment over the
    /// column names with unnumbered `?` placeholders bound from `args`;
    /// `order_by` is a SQL sort fragment. The record form constrains to
    /// that id, AND-combined with `selection` when both are present.
    ///
    /// Read-only: no change event is emitted.
    pub fn query(
        &self,
        uri: &str,
        projection: Option<&[Column]>,
        selection: Option<&str>,
        args: &[&dyn ToSql],
        order_by: Option<&str>,
    ) -> Result<Vec<TransferRecord>> {
        let target = Target::parse(uri)
            .ok_or_else(|| StoreError::UnknownTarget(uri.to_string()))?;

        let cols: Vec<Column> = match projection {
            Some(p) => p.to_vec(),
            None => Column::ALL.to_vec(),
        };

        let mut sql = String::from("SELECT id");
        for col in &cols {
            sql.push_str(", ");
            sql.push_str(col.as_str());
        }
        sql.push_str(" FROM transfers");

        match (target, selection) {
            (Target::TransferId(id), Some(sel)) => {
                sql.push_str(&format!(" WHERE id = {} AND ({})", id, sel));
            }
            (Target::TransferId(id), None) => {
                sql.push_str(&format!(" WHERE id = {}", id));
            }
            (_, Some(sel)) => {
                sql.push_str(" WHERE ");
                sql.push_str(sel);
            }
            (_, None) => {}
        }
        if let Some(order) = order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(args, |row| record_from_row(row, &cols))?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    /// Overwrite the supplied fields on every matching row, returning the
    /// affected-row count.
    ///
    /// The collection form applies `selection` (all rows when absent); the
    /// record form updates exactly that id and does not apply a caller
    /// selection. An empty `values` writes nothing and reports count 0.
    /// Emits a change event even when no row matched.
    pub fn update(
        &self,
        uri: &str,
        values: &TransferValues,
        selection: Option<&str>,
        args: &[&dyn ToSql],
    ) -> Result<usize> {
        let target = match Target::parse(uri) {
            Some(t @ Target::Transfers) | Some(t @ Target::TransferId(_)) => t,
            _ => return Err(StoreError::UnsupportedTarget(uri.to_string())),
        };

        let set = values.set_columns();
        if set.is_empty() {
            tracing::debug!("Update with no fields set via {}", target);
            self.notify(target);
            return Ok(0);
        }

        let mut sql = String::from("UPDATE transfers SET ");
        for (i, (col, _)) in set.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(col.as_str());
            sql.push_str(" = ?");
        }

        let mut bind: Vec<&dyn ToSql> = set.iter().map(|(_, v)| *v).collect();
        match target {
            Target::TransferId(id) => {
                sql.push_str(&format!(" WHERE id = {}", id));
            }
            _ => {
                if let Some(sel) = selection {
                    sql.push_str(" WHERE ");
                    sql.push_str(sel);
                    bind.extend_from_slice(args);
                }
            }
        }

        let conn = self.lock_conn()?;
        let count = conn.execute(&sql, bind.as_slice())?;
        drop(conn);

        tracing::debug!("Updated {} transfer record(s) via {}", count, target);
        self.notify(target);
        Ok(count)
    }

    /// Delete matching rows, returning the removed-row count.
    ///
    /// The collection form deletes rows matching `selection` (all rows
    /// when absent); the record form deletes that id, AND-combined with
    /// the optional extra selection. Emits a change event even when no row
    /// matched.
    pub fn delete(
        &self,
        uri: &str,
        selection: Option<&str>,
        args: &[&dyn ToSql],
    ) -> Result<usize> {
        let target = match Target::parse(uri) {
            Some(t @ Target::Transfers) | Some(t @ Target::TransferId(_)) => t,
            _ => return Err(StoreError::UnsupportedTarget(uri.to_string())),
        };

        let mut sql = String::from("DELETE FROM transfers");
        match (target, selection) {
            (Target::TransferId(id), Some(sel)) => {
                sql.push_str(&format!(" WHERE id = {} AND ({})", id, sel));
            }
            (Target::TransferId(id), None) => {
                sql.push_str(&format!(" WHERE id = {}", id));
            }
            (_, Some(sel)) => {
                sql.push_str(" WHERE ");
                sql.push_str(sel);
            }
            (_, None) => {}
        }

        let conn = self.lock_conn()?;
        let count = conn.execute(&sql, args)?;
        drop(conn);

        tracing::debug!("Deleted {} transfer record(s) via {}", count, target);
        self.notify(target);
        Ok(count)
    }

    /// Type descriptor for a target, distinguishing the collection from a
    /// single record. No storage access.
    pub fn target_kind(&self, uri: &str) -> Result<TargetKind> {
        Target::parse(uri)
            .map(|target| target.kind())
            .ok_or_else(|| StoreError::UnknownTarget(uri.to_string()))
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::State("Poisoned lock".into()))
    }

    fn notify(&self, target: Target) {
        // No subscribers is fine; the event is simply dropped.
        let _ = self.changes.send(ChangeEvent { target });
    }
}

/// Map a constraint violation on insert to its own error kind; everything
/// else propagates as a plain database error.
fn constraint_or_db(e: rusqlite::Error) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::Constraint(e)
        }
        _ => StoreError::Database(e),
    }
}

fn record_from_row(row: &rusqlite::Row<'_>, cols: &[Column]) -> rusqlite::Result<TransferRecord> {
    let mut record = TransferRecord {
        id: row.get(0)?,
        ..TransferRecord::default()
    };
    for (i, col) in cols.iter().enumerate() {
        let idx = i + 1;
        match col {
            Column::SessionId => record.session_id = row.get(idx)?,
            Column::Contact => record.contact = row.get(idx)?,
            Column::Name => record.name = row.get(idx)?,
            Column::MimeType => record.mime_type = row.get(idx)?,
            Column::Status => record.status = row.get(idx)?,
            Column::Direction => record.direction = row.get(idx)?,
            Column::Timestamp => record.timestamp = row.get(idx)?,
            Column::Size => record.size = row.get(idx)?,
            Column::TotalSize => record.total_size = row.get(idx)?,
        }
    }
    Ok(record)
}
