//! Error types for ftstore

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    #[error("Unsupported target for write: {0}")]
    UnsupportedTarget(String),

    #[error("Constraint violation: {0}")]
    Constraint(#[source] rusqlite::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("State error: {0}")]
    State(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
