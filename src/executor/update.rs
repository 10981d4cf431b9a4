use tracing::{debug, warn};

use crate::connection::DbConnection;
use crate::error::BridgeError;

pub(crate) fn run_update<C: DbConnection>(conn: &mut C, sql: &str) -> Result<usize, BridgeError> {
    debug!(db = ?conn.database_type(), sql, "executing update");

    conn.set_autocommit(false)
        .map_err(|source| BridgeError::Update {
            source,
            rollback: None,
        })?;

    // Commit or roll back is decided on this result before anything returns.
    let outcome = conn
        .execute_dml(sql)
        .and_then(|count| conn.commit().map(|()| count));

    match outcome {
        Ok(count) => {
            debug!(count, "update committed");
            Ok(count)
        }
        Err(source) => {
            warn!(error = %source, "update failed, rolling back");
            let rollback = conn.rollback().err();
            if let Some(err) = &rollback {
                warn!(error = %err, "rollback failed");
            }
            Err(BridgeError::Update { source, rollback })
        }
    }
}
