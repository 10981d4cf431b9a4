use crate::error::DbError;
use crate::results::ResultSet;
use crate::types::DatabaseType;

/// An already-open database connection owned by the host.
///
/// Implementations scope every statement and cursor to the call that created it and
/// release them (cursor first) before returning, on success and on error alike.
/// A connection is not safe to share between concurrent callers; the transaction mode
/// set here is connection-wide.
pub trait DbConnection {
    fn database_type(&self) -> DatabaseType;

    /// Run `sql` as a query and drain its cursor.
    ///
    /// Returns `Ok(None)` when the statement produced no cursor at all (its metadata
    /// reports no result columns). The statement is still executed in that case.
    ///
    /// # Errors
    /// Returns `DbError` if preparation, execution, metadata access or a row read fails.
    fn select(&mut self, sql: &str) -> Result<Option<ResultSet>, DbError>;

    /// Run `sql` as a mutating statement and return the rows it affected.
    ///
    /// # Errors
    /// Returns `DbError` if preparation or execution fails.
    fn execute_dml(&mut self, sql: &str) -> Result<usize, DbError>;

    /// Switch implicit per-statement commit on or off.
    ///
    /// # Errors
    /// Returns `DbError` if the driver rejects the mode change.
    fn set_autocommit(&mut self, enabled: bool) -> Result<(), DbError>;

    fn is_autocommit(&self) -> bool;

    /// # Errors
    /// Returns `DbError` if the commit fails.
    fn commit(&mut self) -> Result<(), DbError>;

    /// # Errors
    /// Returns `DbError` if the rollback fails.
    fn rollback(&mut self) -> Result<(), DbError>;
}

impl<C: DbConnection + ?Sized> DbConnection for &mut C {
    fn database_type(&self) -> DatabaseType {
        (**self).database_type()
    }

    fn select(&mut self, sql: &str) -> Result<Option<ResultSet>, DbError> {
        (**self).select(sql)
    }

    fn execute_dml(&mut self, sql: &str) -> Result<usize, DbError> {
        (**self).execute_dml(sql)
    }

    fn set_autocommit(&mut self, enabled: bool) -> Result<(), DbError> {
        (**self).set_autocommit(enabled)
    }

    fn is_autocommit(&self) -> bool {
        (**self).is_autocommit()
    }

    fn commit(&mut self) -> Result<(), DbError> {
        (**self).commit()
    }

    fn rollback(&mut self) -> Result<(), DbError> {
        (**self).rollback()
    }
}
