use std::sync::Arc;

use crate::error::DbError;
use crate::types::RowValues;

use super::row::{JsonRow, RowSet};

/// Rows drained from one cursor, in cursor order, addressed by column position.
///
/// Column names are read once from the statement metadata and shared by every row.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    column_names: Arc<Vec<String>>,
    rows: Vec<Vec<RowValues>>,
}

impl ResultSet {
    /// Create an empty result set for the given column metadata.
    #[must_use]
    pub fn new(column_names: Vec<String>) -> Self {
        Self::with_capacity(column_names, 0)
    }

    /// Create an empty result set with room for `capacity` rows.
    #[must_use]
    pub fn with_capacity(column_names: Vec<String>, capacity: usize) -> Self {
        Self {
            column_names: Arc::new(column_names),
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Column names in positional order (duplicates preserved).
    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    /// Append one cursor row.
    ///
    /// # Errors
    /// Returns `DbError::ExecutionError` if the row width differs from the column count.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) -> Result<(), DbError> {
        if row_values.len() != self.column_names.len() {
            return Err(DbError::ExecutionError(format!(
                "row has {} values but the result has {} columns",
                row_values.len(),
                self.column_names.len()
            )));
        }
        self.rows.push(row_values);
        Ok(())
    }

    /// Positional rows in cursor order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<RowValues>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Key every row by column name. When two columns share a name the later column wins.
    #[must_use]
    pub fn into_row_set(self) -> RowSet {
        let columns = self.column_names;
        let rows = self
            .rows
            .into_iter()
            .map(|values| JsonRow::from_positional(&columns, values))
            .collect();
        RowSet::new(columns, rows)
    }
}
