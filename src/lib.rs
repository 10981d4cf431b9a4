//! Execute raw SQL against a host-owned connection and hand back either the rows as a
//! JSON array of objects or the affected-row count of a committed update.
//!
//! The host opens and closes the connection; this crate only runs statements on it,
//! maps driver-typed columns to [`RowValues`], and serializes them with
//! [`RowSerializer`]. Date/time values are written as `YYYY-MM-DDTHH:MM:SS.mmmZ` from
//! their wall-clock fields, with no time-zone conversion.
//!
//! Backends: `SQLite` through `rusqlite` (feature `sqlite`, on by default) and Postgres
//! through `tokio-postgres` (feature `postgres`).

pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod results;
pub mod serializer;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{BridgeOptions, BridgeOptionsBuilder};
pub use connection::DbConnection;
pub use error::{BridgeError, DbError};
pub use executor::{ExecOutcome, SqlJsonBridge, StatementKind};
pub use results::{JsonRow, ResultSet, RowSet};
pub use serializer::{RowSerializer, TIMESTAMP_FORMAT, format_timestamp};
pub use types::{BinaryEncoding, DatabaseType, NullFields, RowValues};

#[cfg(feature = "sqlite")]
pub use rusqlite;
#[cfg(feature = "postgres")]
pub use tokio_postgres;
