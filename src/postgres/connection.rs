use tokio::runtime::Handle;
use tokio_postgres::Client;

use crate::connection::DbConnection;
use crate::error::DbError;
use crate::results::ResultSet;
use crate::types::DatabaseType;

use super::query::build_result_set_from_statement;

/// A host-owned `tokio_postgres::Client` seen through [`DbConnection`].
///
/// Each call blocks on `runtime` until the round trip finishes. While autocommit is off,
/// the first statement of any kind opens a transaction with `BEGIN`. A failed statement
/// leaves that transaction aborted until the host rolls it back.
///
/// # Panics
/// Every [`DbConnection`] method panics if called from inside an async context, because
/// it uses [`Handle::block_on`].
pub struct PostgresConnection<'a> {
    client: &'a Client,
    runtime: Handle,
    autocommit: bool,
    in_transaction: bool,
}

impl<'a> PostgresConnection<'a> {
    #[must_use]
    pub fn new(client: &'a Client, runtime: Handle) -> Self {
        Self {
            client,
            runtime,
            autocommit: true,
            in_transaction: false,
        }
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        self.client
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    fn batch(&self, sql: &str) -> Result<(), DbError> {
        self.runtime
            .block_on(self.client.batch_execute(sql))
            .map_err(DbError::PostgresError)
    }

    fn begin_if_needed(&mut self) -> Result<(), DbError> {
        if !self.autocommit && !self.in_transaction {
            self.batch("BEGIN")?;
            self.in_transaction = true;
        }
        Ok(())
    }
}

impl DbConnection for PostgresConnection<'_> {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Postgres
    }

    fn select(&mut self, sql: &str) -> Result<Option<ResultSet>, DbError> {
        self.begin_if_needed()?;
        let client = self.client;
        self.runtime.block_on(async move {
            let stmt = client.prepare(sql).await?;
            if stmt.columns().is_empty() {
                client.execute(&stmt, &[]).await?;
                return Ok(None);
            }
            let rows = client.query(&stmt, &[]).await?;
            build_result_set_from_statement(&stmt, &rows).map(Some)
        })
    }

    fn execute_dml(&mut self, sql: &str) -> Result<usize, DbError> {
        self.begin_if_needed()?;
        let client = self.client;
        let affected = self.runtime.block_on(async move {
            let stmt = client.prepare(sql).await?;
            client.execute(&stmt, &[]).await
        })?;
        usize::try_from(affected).map_err(|e| {
            DbError::ExecutionError(format!("postgres affected rows conversion error: {e}"))
        })
    }

    fn set_autocommit(&mut self, enabled: bool) -> Result<(), DbError> {
        if enabled && self.in_transaction {
            self.batch("COMMIT")?;
            self.in_transaction = false;
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
        if self.in_transaction {
            self.batch("COMMIT")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DbError> {
        if self.autocommit {
            return Err(DbError::TransactionError(
                "rollback requested while autocommit is enabled".into(),
            ));
        }
        if self.in_transaction {
            // The transaction is over whether or not ROLLBACK reaches the server.
            self.in_transaction = false;
            self.batch("ROLLBACK")?;
        }
        Ok(())
    }
}
