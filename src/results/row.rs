use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::RowValues;

/// One result row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRow {
    values: BTreeMap<String, RowValues>,
}

impl JsonRow {
    /// Build a row by storing every positional value under its column name, in column
    /// order, so a repeated name ends up holding the value of its last column.
    #[must_use]
    pub fn from_positional(column_names: &[String], values: Vec<RowValues>) -> Self {
        let mut row = BTreeMap::new();
        for (name, value) in column_names.iter().zip(values) {
            row.insert(name.clone(), value);
        }
        Self { values: row }
    }

    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.values.get(column_name)
    }

    /// Iterate `(column name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered rows of one query, materialized before serialization.
///
/// The set is read-only once built; it never refers back to the connection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    columns: Arc<Vec<String>>,
    rows: Vec<JsonRow>,
}

impl RowSet {
    pub(crate) fn new(columns: Arc<Vec<String>>, rows: Vec<JsonRow>) -> Self {
        Self { columns, rows }
    }

    /// Column names as reported by the driver, in positional order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[JsonRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JsonRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a JsonRow;
    type IntoIter = std::slice::Iter<'a, JsonRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
