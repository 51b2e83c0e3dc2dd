//! Target addressing for store operations
//!
//! Every operation is addressed by a conceptual URI of the form
//! `<namespace>/transfers[/<id>]`. Three forms are recognized:
//! - `ftstore/transfers`: the whole collection
//! - `ftstore/transfers/<id>`: a single record
//! - `ftapi/transfers`: the collection under its alternate public name
//!
//! Anything else fails to parse; operations map that to the appropriate
//! error kind (`UnknownTarget` for reads and type queries,
//! `UnsupportedTarget` for writes).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary namespace owning the transfers collection.
pub const NAMESPACE: &str = "ftstore";

/// Alternate public namespace. Read-identical to the primary collection
/// form, but rejected for writes.
pub const API_NAMESPACE: &str = "ftapi";

const COLLECTION: &str = "transfers";

/// Parsed operation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// All records, primary namespace.
    Transfers,
    /// One record, addressed by id.
    TransferId(i64),
    /// All records, alternate namespace.
    ApiTransfers,
}

impl Target {
    /// Parse a target URI.
    ///
    /// Returns `None` for anything outside the three recognized forms. The
    /// id segment must consist solely of ASCII digits.
    pub fn parse(uri: &str) -> Option<Target> {
        let mut segments = uri.split('/');
        let namespace = segments.next()?;
        let collection = segments.next()?;
        let id_segment = segments.next();
        if segments.next().is_some() || collection != COLLECTION {
            return None;
        }

        match (namespace, id_segment) {
            (NAMESPACE, None) => Some(Target::Transfers),
            (NAMESPACE, Some(seg)) => {
                if seg.is_empty() || !seg.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                seg.parse::<i64>().ok().map(Target::TransferId)
            }
            (API_NAMESPACE, None) => Some(Target::ApiTransfers),
            _ => None,
        }
    }

    /// Content shape this target addresses.
    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Transfers | Target::ApiTransfers => TargetKind::Collection,
            Target::TransferId(_) => TargetKind::Record,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Transfers => write!(f, "{}/{}", NAMESPACE, COLLECTION),
            Target::TransferId(id) => write!(f, "{}/{}/{}", NAMESPACE, COLLECTION, id),
            Target::ApiTransfers => write!(f, "{}/{}", API_NAMESPACE, COLLECTION),
        }
    }
}

/// Stable type descriptor distinguishing the collection of records from a
/// single record, for collaborators that negotiate content shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Collection,
    Record,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Collection => "transfer-collection",
            TargetKind::Record => "transfer-record",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_forms() {
        assert_eq!(Target::parse("ftstore/transfers"), Some(Target::Transfers));
        assert_eq!(
            Target::parse("ftstore/transfers/42"),
            Some(Target::TransferId(42))
        );
        assert_eq!(Target::parse("ftapi/transfers"), Some(Target::ApiTransfers));
    }

    #[test]
    fn rejects_unknown_forms() {
        assert_eq!(Target::parse(""), None);
        assert_eq!(Target::parse("ftstore"), None);
        assert_eq!(Target::parse("ftstore/other"), None);
        assert_eq!(Target::parse("ftstore/transfers/abc"), None);
        assert_eq!(Target::parse("ftstore/transfers/-3"), None);
        assert_eq!(Target::parse("ftstore/transfers/"), None);
        assert_eq!(Target::parse("ftstore/transfers/1/2"), None);
        assert_eq!(Target::parse("ftapi/transfers/1"), None);
        assert_eq!(Target::parse("elsewhere/transfers"), None);
    }

    #[test]
    fn display_round_trips() {
        for target in [
            Target::Transfers,
            Target::TransferId(7),
            Target::ApiTransfers,
        ] {
            assert_eq!(Target::parse(&target.to_string()), Some(target));
        }
    }

    #[test]
    fn kind_distinguishes_shapes() {
        assert_eq!(Target::Transfers.kind(), TargetKind::Collection);
        assert_eq!(Target::ApiTransfers.kind(), TargetKind::Collection);
        assert_eq!(Target::TransferId(1).kind(), TargetKind::Record);
        assert_eq!(TargetKind::Collection.as_str(), "transfer-collection");
        assert_eq!(TargetKind::Record.as_str(), "transfer-record");
    }
}
