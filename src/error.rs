use thiserror::Error;

/// Errors raised by a [`crate::DbConnection`] implementation.
#[derive(Debug, Error)]
pub enum DbError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[error("column `{column}` has unsupported type `{type_name}`")]
    UnsupportedType { column: String, type_name: String },

    #[error("Transaction error: {0}")]
    TransactionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

/// Errors returned to the host by [`crate::SqlJsonBridge`].
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Statement preparation, execution, metadata or row-read failure on the query path.
    #[error("query failed: {0}")]
    Query(#[source] DbError),

    /// Failure on the mutating path. The transaction was rolled back; if the rollback
    /// itself failed, that failure is kept in `rollback`.
    #[error("update failed: {source}{}", rollback_suffix(.rollback.as_ref()))]
    Update {
        #[source]
        source: DbError,
        rollback: Option<DbError>,
    },

    /// A value has no JSON representation under the active options.
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn rollback_suffix(rollback: Option<&DbError>) -> String {
    match rollback {
        Some(err) => format!(" (rollback also failed: {err})"),
        None => String::new(),
    }
}

impl BridgeError {
    /// True when the error came from the update path and its rollback also failed.
    #[must_use]
    pub fn rollback_failed(&self) -> bool {
        matches!(self, BridgeError::Update { rollback: Some(_), .. })
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn update_error_reports_rollback_failure_distinctly() {
        let err = BridgeError::Update {
            source: DbError::ExecutionError("constraint violated".into()),
            rollback: Some(DbError::TransactionError("connection lost".into())),
        };
        assert!(err.rollback_failed());
        let msg = err.to_string();
        assert!(msg.contains("constraint violated"), "{msg}");
        assert!(msg.contains("rollback also failed"), "{msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn update_error_without_rollback_failure() {
        let err = BridgeError::Update {
            source: DbError::ExecutionError("boom".into()),
            rollback: None,
        };
        assert!(!err.rollback_failed());
        assert_eq!(err.to_string(), "update failed: SQL execution error: boom");
    }
}
