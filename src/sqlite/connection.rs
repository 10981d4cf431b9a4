use rusqlite::Connection;

use crate::connection::DbConnection;
use crate::error::DbError;
use crate::results::ResultSet;
use crate::types::DatabaseType;

use super::query::build_result_set;

/// A host-owned `rusqlite::Connection` seen through [`DbConnection`].
///
/// `SQLite` has no connection-level autocommit switch, so manual-commit mode is emulated:
/// while autocommit is off, the first statement of any kind (query or update) opens a
/// transaction with `BEGIN`, and it stays open until [`DbConnection::commit`],
/// [`DbConnection::rollback`], or autocommit is switched back on.
pub struct SqliteConnection<'a> {
    conn: &'a mut Connection,
    autocommit: bool,
}

impl<'a> SqliteConnection<'a> {
    #[must_use]
    pub fn new(conn: &'a mut Connection) -> Self {
        Self {
            conn,
            autocommit: true,
        }
    }

    /// Borrow the underlying connection.
    #[must_use]
    pub fn raw(&self) -> &Connection {
        self.conn
    }

    /// True while `SQLite` itself has a transaction open on this connection.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    fn begin_if_needed(&mut self) -> Result<(), DbError> {
        if !self.autocommit && self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }
}

impl DbConnection for SqliteConnection<'_> {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }

    fn select(&mut self, sql: &str) -> Result<Option<ResultSet>, DbError> {
        self.begin_if_needed()?;
        let mut stmt = self.conn.prepare(sql)?;
        build_result_set(&mut stmt)
    }

    fn execute_dml(&mut self, sql: &str) -> Result<usize, DbError> {
        self.begin_if_needed()?;
        let mut stmt = self.conn.prepare(sql)?;
        let affected = stmt.execute([])?;
        Ok(affected)
    }

    fn set_autocommit(&mut self, enabled: bool) -> Result<(), DbError> {
        if enabled && !self.autocommit && self.in_transaction() {
            self.conn.execute_batch("COMMIT")?;
        }
        self.autocommit = enabled;
        Ok(())
    }

    fn is_autocommit(&self) -> bool {
        self.autocommit
    }

    fn commit(&mut self) -> Result<(), DbError> {
        if self.autocommit {
            return Err(DbError::TransactionError(
                "commit requested while autocommit is enabled".into(),
            ));
        }
        if self.in_transaction() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DbError> {
        if self.autocommit {
            return Err(DbError::TransactionError(
                "rollback requested while autocommit is enabled".into(),
            ));
        }
        // SQLite may already have rolled back on its own (e.g. SQLITE_FULL).
        if self.in_transaction() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }
}
