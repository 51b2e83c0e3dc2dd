//! ftstore: File Transfer Record Store
//!
//! Persists metadata records describing file-transfer attempts (session,
//! contact, file name, MIME type, progress) in a single SQLite table and
//! exposes uniform CRUD addressed by target URIs:
//! - `ftstore/transfers`: the whole collection
//! - `ftstore/transfers/<id>`: a single record
//! - `ftapi/transfers`: read-only alias of the collection
//!
//! Every successful mutation broadcasts a [`ChangeEvent`] identifying the
//! affected address, for external observers such as UIs or cache
//! invalidators.

pub mod address;
pub mod changes;
pub mod error;
pub mod record;
pub mod storage;

pub use address::{Target, TargetKind, API_NAMESPACE, NAMESPACE};
pub use changes::ChangeEvent;
pub use error::{Result, StoreError};
pub use record::{Column, TransferRecord, TransferValues};
pub use storage::{default_db_path, TransferStore, DATABASE_NAME};

// Callers bind selection placeholders through these.
pub use rusqlite::{params, ToSql};
