//! Record types for the transfers table

use std::fmt;

use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

/// One file-transfer attempt, as stored.
///
/// Every column except the id is nullable at the storage layer and the
/// store performs no defaulting: a field never written reads back as
/// `None`. Callers that need concrete values must supply explicit defaults
/// themselves. `status` and `direction` are external enumerations, opaque
/// to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: i64,
    pub session_id: Option<String>,
    pub contact: Option<String>,
    pub name: Option<String>,
    pub mime_type: Option<String>,
    pub status: Option<i32>,
    pub direction: Option<i32>,
    pub timestamp: Option<i64>,
    pub size: Option<i64>,
    pub total_size: Option<i64>,
}

impl fmt::Display for TransferRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}/{} bytes)",
            self.name.as_deref().unwrap_or("?"),
            self.size.unwrap_or(0),
            self.total_size.unwrap_or(0),
        )
    }
}

/// Partial field set for insert and update.
///
/// The id is generated by the store and cannot be supplied here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferValues {
    pub session_id: Option<String>,
    pub contact: Option<String>,
    pub name: Option<String>,
    pub mime_type: Option<String>,
    pub status: Option<i32>,
    pub direction: Option<i32>,
    pub timestamp: Option<i64>,
    pub size: Option<i64>,
    pub total_size: Option<i64>,
}

impl TransferValues {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.set_columns().is_empty()
    }

    /// (column, value) pairs for the fields that are set.
    pub(crate) fn set_columns(&self) -> Vec<(Column, &dyn ToSql)> {
        let mut set: Vec<(Column, &dyn ToSql)> = Vec::new();
        if let Some(v) = &self.session_id {
            set.push((Column::SessionId, v));
        }
        if let Some(v) = &self.contact {
            set.push((Column::Contact, v));
        }
        if let Some(v) = &self.name {
            set.push((Column::Name, v));
        }
        if let Some(v) = &self.mime_type {
            set.push((Column::MimeType, v));
        }
        if let Some(v) = &self.status {
            set.push((Column::Status, v));
        }
        if let Some(v) = &self.direction {
            set.push((Column::Direction, v));
        }
        if let Some(v) = &self.timestamp {
            set.push((Column::Timestamp, v));
        }
        if let Some(v) = &self.size {
            set.push((Column::Size, v));
        }
        if let Some(v) = &self.total_size {
            set.push((Column::TotalSize, v));
        }
        set
    }
}

/// The nine non-id columns, used for projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    SessionId,
    Contact,
    Name,
    MimeType,
    Status,
    Direction,
    Timestamp,
    Size,
    TotalSize,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::SessionId,
        Column::Contact,
        Column::Name,
        Column::MimeType,
        Column::Status,
        Column::Direction,
        Column::Timestamp,
        Column::Size,
        Column::TotalSize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::SessionId => "session_id",
            Column::Contact => "contact",
            Column::Name => "name",
            Column::MimeType => "mime_type",
            Column::Status => "status",
            Column::Direction => "direction",
            Column::Timestamp => "timestamp",
            Column::Size => "size",
            Column::TotalSize => "total_size",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_columns_tracks_supplied_fields() {
        let values = TransferValues {
            name: Some("a.png".to_string()),
            size: Some(12),
            ..Default::default()
        };
        let cols: Vec<Column> = values.set_columns().iter().map(|(c, _)| *c).collect();
        assert_eq!(cols, vec![Column::Name, Column::Size]);
        assert!(!values.is_empty());
        assert!(TransferValues::default().is_empty());
    }
}
