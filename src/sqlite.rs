//! `SQLite` backend over a borrowed `rusqlite::Connection`.

pub mod connection;
pub mod query;

pub use connection::SqliteConnection;
pub use query::{build_result_set, sqlite_extract_value};
