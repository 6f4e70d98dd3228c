//! Database module
//!
//! SQLite-backed session cache: connection pool, schema migrations and the
//! snapshot store.

pub mod cache;
pub mod connection;
pub mod migrations;

pub use cache::SnapshotCache;
pub use connection::{Database, DbError, DbResult};
