//! The host-facing [`SqlJsonBridge`] and the query/update paths behind it.

mod dispatch;
mod query;
mod update;

pub use dispatch::{ExecOutcome, StatementKind};

use crate::config::BridgeOptions;
use crate::connection::DbConnection;
use crate::error::BridgeError;
use crate::results::RowSet;
use crate::serializer::RowSerializer;

/// Runs raw SQL on a host-owned connection and returns JSON rows or affected counts.
///
/// The bridge never opens, pools or closes the connection. Hand it an owned
/// [`DbConnection`] or a `&mut` borrow of one.
///
/// ```rust,no_run
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// use sql_json_bridge::prelude::*;
///
/// let mut raw = sql_json_bridge::rusqlite::Connection::open_in_memory()?;
/// let mut bridge = SqlJsonBridge::new(SqliteConnection::new(&mut raw));
/// bridge.execute_query("CREATE TABLE t (id INTEGER)")?;
/// assert_eq!(bridge.execute_update("INSERT INTO t VALUES (1), (2)")?, 2);
/// assert_eq!(bridge.execute_query("SELECT id FROM t ORDER BY id")?, r#"[{"id":1},{"id":2}]"#);
/// # Ok(())
/// # }
/// ```
pub struct SqlJsonBridge<C> {
    conn: C,
    options: BridgeOptions,
}

impl<C: DbConnection> SqlJsonBridge<C> {
    #[must_use]
    pub fn new(conn: C) -> Self {
        Self::with_options(conn, BridgeOptions::default())
    }

    #[must_use]
    pub fn with_options(conn: C, options: BridgeOptions) -> Self {
        Self { conn, options }
    }

    #[must_use]
    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    #[must_use]
    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    /// Give the connection back to the host.
    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Run `sql` as a query and return its rows as a JSON array of objects.
    ///
    /// Returns `""` (not `"[]"`) when the statement produced no cursor at all.
    ///
    /// # Errors
    /// `BridgeError::Query` on execution or read failure, `BridgeError::Serialization`
    /// when a value has no JSON form.
    pub fn execute_query(&mut self, sql: &str) -> Result<String, BridgeError> {
        match query::run_query(&mut self.conn, sql)? {
            Some(rows) => RowSerializer::new(self.options).to_json(&rows),
            None => Ok(String::new()),
        }
    }

    /// Run `sql` as a query and return the materialized rows without serializing them.
    ///
    /// # Errors
    /// See [`SqlJsonBridge::execute_query`].
    pub fn query_rows(&mut self, sql: &str) -> Result<Option<RowSet>, BridgeError> {
        query::run_query(&mut self.conn, sql)
    }

    /// Run `sql` inside its own transaction and return the affected-row count.
    ///
    /// Autocommit is switched off first and left off afterwards. On failure the
    /// transaction is rolled back and the error is returned; a count is only returned
    /// once the commit succeeded.
    ///
    /// # Errors
    /// `BridgeError::Update` carrying the execution or commit failure, plus the rollback
    /// failure if there was one.
    pub fn execute_update(&mut self, sql: &str) -> Result<usize, BridgeError> {
        update::run_update(&mut self.conn, sql)
    }

    /// Route `sql` to [`SqlJsonBridge::execute_update`] or
    /// [`SqlJsonBridge::execute_query`] by its leading keyword.
    ///
    /// # Errors
    /// Whatever the chosen path returns.
    pub fn execute(&mut self, sql: &str) -> Result<ExecOutcome, BridgeError> {
        match StatementKind::classify(sql) {
            StatementKind::Update => self.execute_update(sql).map(ExecOutcome::Affected),
            StatementKind::Query => self.execute_query(sql).map(ExecOutcome::Rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::results::ResultSet;
    use crate::types::{DatabaseType, RowValues};

    /// Scripted connection that records the calls it receives.
    #[derive(Default)]
    struct FakeConnection {
        select_result: Option<Result<Option<ResultSet>, String>>,
        dml_result: Option<Result<usize, String>>,
        fail_commit: bool,
        fail_rollback: bool,
        unsupported_column: bool,
        autocommit: bool,
        calls: Vec<&'static str>,
    }

    impl FakeConnection {
        fn new() -> Self {
            Self {
                autocommit: true,
                ..Self::default()
            }
        }
    }

    impl DbConnection for FakeConnection {
        fn database_type(&self) -> DatabaseType {
            DatabaseType::Sqlite
        }

        fn select(&mut self, _sql: &str) -> Result<Option<ResultSet>, DbError> {
            self.calls.push("select");
            if self.unsupported_column {
                return Err(DbError::UnsupportedType {
                    column: "amount".into(),
                    type_name: "numeric".into(),
                });
            }
            match self.select_result.take() {
                Some(Ok(rs)) => Ok(rs),
                Some(Err(msg)) => Err(DbError::ExecutionError(msg)),
                None => Ok(None),
            }
        }

        fn execute_dml(&mut self, _sql: &str) -> Result<usize, DbError> {
            self.calls.push("execute");
            match self.dml_result.take() {
                Some(Ok(n)) => Ok(n),
                Some(Err(msg)) => Err(DbError::ExecutionError(msg)),
                None => Ok(0),
            }
        }

        fn set_autocommit(&mut self, enabled: bool) -> Result<(), DbError> {
            self.calls.push(if enabled { "autocommit_on" } else { "autocommit_off" });
            self.autocommit = enabled;
            Ok(())
        }

        fn is_autocommit(&self) -> bool {
            self.autocommit
        }

        fn commit(&mut self) -> Result<(), DbError> {
            self.calls.push("commit");
            if self.fail_commit {
                Err(DbError::TransactionError("commit refused".into()))
            } else {
                Ok(())
            }
        }

        fn rollback(&mut self) -> Result<(), DbError> {
            self.calls.push("rollback");
            if self.fail_rollback {
                Err(DbError::TransactionError("rollback refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn update_commits_and_returns_count() {
        let mut conn = FakeConnection::new();
        conn.dml_result = Some(Ok(3));
        let mut bridge = SqlJsonBridge::new(&mut conn);
        assert_eq!(bridge.execute_update("UPDATE t SET a = 1").unwrap(), 3);
        assert_eq!(conn.calls, vec!["autocommit_off", "execute", "commit"]);
        assert!(!conn.is_autocommit());
    }

    #[test]
    fn failed_update_rolls_back_and_propagates() {
        let mut conn = FakeConnection::new();
        conn.dml_result = Some(Err("constraint".into()));
        let err = SqlJsonBridge::new(&mut conn)
            .execute_update("UPDATE t SET a = 1")
            .unwrap_err();
        match err {
            BridgeError::Update { source, rollback } => {
                assert!(source.to_string().contains("constraint"));
                assert!(rollback.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(conn.calls, vec!["autocommit_off", "execute", "rollback"]);
    }

    #[test]
    fn rollback_failure_is_kept_alongside_the_original_error() {
        let mut conn = FakeConnection::new();
        conn.dml_result = Some(Err("disk full".into()));
        conn.fail_rollback = true;
        let err = SqlJsonBridge::new(&mut conn)
            .execute_update("DELETE FROM t")
            .unwrap_err();
        assert!(err.rollback_failed());
        let msg = err.to_string();
        assert!(msg.contains("disk full"), "{msg}");
        assert!(msg.contains("rollback refused"), "{msg}");
    }

    #[test]
    fn commit_failure_rolls_back() {
        let mut conn = FakeConnection::new();
        conn.dml_result = Some(Ok(5));
        conn.fail_commit = true;
        let err = SqlJsonBridge::new(&mut conn)
            .execute_update("UPDATE t SET a = 1")
            .unwrap_err();
        assert!(matches!(err, BridgeError::Update { rollback: None, .. }));
        assert_eq!(
            conn.calls,
            vec!["autocommit_off", "execute", "commit", "rollback"]
        );
    }

    #[test]
    fn no_cursor_is_empty_string() {
        let mut conn = FakeConnection::new();
        let mut bridge = SqlJsonBridge::new(&mut conn);
        assert_eq!(bridge.execute_query("CALL something()").unwrap(), "");
        assert!(bridge.query_rows("CALL something()").unwrap().is_none());
    }

    #[test]
    fn empty_cursor_is_empty_array() {
        let mut conn = FakeConnection::new();
        conn.select_result = Some(Ok(Some(ResultSet::new(vec!["a".into()]))));
        let json = SqlJsonBridge::new(&mut conn)
            .execute_query("SELECT a FROM t WHERE 0")
            .unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn query_failure_is_query_error() {
        let mut conn = FakeConnection::new();
        conn.select_result = Some(Err("no such table".into()));
        let err = SqlJsonBridge::new(&mut conn)
            .execute_query("SELECT * FROM missing")
            .unwrap_err();
        assert!(matches!(err, BridgeError::Query(_)));
    }

    #[test]
    fn unsupported_driver_type_is_serialization_error() {
        let mut conn = FakeConnection::new();
        conn.unsupported_column = true;
        let err = SqlJsonBridge::new(&mut conn)
            .execute_query("SELECT amount FROM ledger")
            .unwrap_err();
        assert!(matches!(err, BridgeError::Serialization(ref m) if m.contains("numeric")));
    }

    #[test]
    fn execute_dispatches_on_prefix() {
        let mut conn = FakeConnection::new();
        conn.dml_result = Some(Ok(2));
        let mut rs = ResultSet::new(vec!["n".into()]);
        rs.add_row_values(vec![RowValues::Int(9)]).unwrap();
        conn.select_result = Some(Ok(Some(rs)));

        let mut bridge = SqlJsonBridge::new(&mut conn);
        assert_eq!(
            bridge.execute("delete from t").unwrap(),
            ExecOutcome::Affected(2)
        );
        assert_eq!(
            bridge.execute("select n from t").unwrap(),
            ExecOutcome::Rows(r#"[{"n":9}]"#.into())
        );
    }
}
