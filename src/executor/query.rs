use tracing::debug;

use crate::connection::DbConnection;
use crate::error::{BridgeError, DbError};
use crate::results::RowSet;

pub(crate) fn run_query<C: DbConnection>(
    conn: &mut C,
    sql: &str,
) -> Result<Option<RowSet>, BridgeError> {
    debug!(db = ?conn.database_type(), sql, "executing query");

    let Some(result_set) = conn.select(sql).map_err(query_error)? else {
        debug!("statement returned no cursor");
        return Ok(None);
    };

    debug!(
        rows = result_set.len(),
        columns = result_set.column_count(),
        "drained cursor"
    );
    Ok(Some(result_set.into_row_set()))
}

fn query_error(err: DbError) -> BridgeError {
    match err {
        DbError::UnsupportedType { .. } => BridgeError::Serialization(err.to_string()),
        other => BridgeError::Query(other),
    }
}
