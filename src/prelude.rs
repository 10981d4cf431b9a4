//! Convenient imports for common functionality.

pub use crate::config::{BridgeOptions, BridgeOptionsBuilder};
pub use crate::connection::DbConnection;
pub use crate::error::{BridgeError, DbError};
pub use crate::executor::{ExecOutcome, SqlJsonBridge, StatementKind};
pub use crate::results::{JsonRow, ResultSet, RowSet};
pub use crate::serializer::RowSerializer;
pub use crate::types::{BinaryEncoding, DatabaseType, NullFields, RowValues};

#[cfg(feature = "postgres")]
pub use crate::postgres::PostgresConnection;
#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteConnection;
