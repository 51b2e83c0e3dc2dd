pub mod connection;
pub(crate) mod idgen;
pub mod store;

// Common exports
pub use connection::{default_db_path, DATABASE_NAME};
pub use store::TransferStore;
