use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rusqlite::Statement;
use rusqlite::types::ValueRef;

use crate::error::DbError;
use crate::results::ResultSet;
use crate::types::RowValues;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M",
];

/// Layouts carrying a `[+-]HH:MM` offset; only the wall clock is kept.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M%:z",
];

/// How a column's declared type steers value conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclaredKind {
    Boolean,
    Temporal,
    Plain,
}

impl DeclaredKind {
    pub(crate) fn from_decl_type(decl: Option<&str>) -> Self {
        let Some(decl) = decl else {
            return DeclaredKind::Plain;
        };
        let upper = decl.to_ascii_uppercase();
        if upper.contains("BOOL") {
            DeclaredKind::Boolean
        } else if upper.contains("DATE") || upper.contains("TIME") {
            DeclaredKind::Temporal
        } else {
            DeclaredKind::Plain
        }
    }
}

fn parse_sqlite_timestamp(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            OFFSET_DATETIME_FORMATS.iter().find_map(|fmt| {
                DateTime::parse_from_str(text, fmt)
                    .ok()
                    .map(|dt| dt.naive_local())
            })
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Extract a `RowValues` from a `SQLite` row, using the column's declared type to
/// recover booleans and date/times that `SQLite` stores as integers and text.
///
/// # Errors
/// Returns `DbError::SqliteError` if the column cannot be read.
pub fn sqlite_extract_value(
    row: &rusqlite::Row,
    idx: usize,
    decl_type: Option<&str>,
) -> Result<RowValues, DbError> {
    let kind = DeclaredKind::from_decl_type(decl_type);
    let value = row.get_ref(idx)?;
    Ok(convert_value_ref(value, kind))
}

pub(crate) fn convert_value_ref(value: ValueRef<'_>, kind: DeclaredKind) -> RowValues {
    match (value, kind) {
        (ValueRef::Null, _) => RowValues::Null,
        (ValueRef::Integer(i), DeclaredKind::Boolean) => RowValues::Bool(i != 0),
        (ValueRef::Integer(i), _) => RowValues::Int(i),
        (ValueRef::Real(f), _) => RowValues::Float(f),
        // Text that is not valid UTF-8 is passed through untouched as bytes.
        (ValueRef::Text(bytes), kind) => {
            let Ok(s) = std::str::from_utf8(bytes) else {
                return RowValues::Blob(bytes.to_vec());
            };
            if kind == DeclaredKind::Temporal {
                if let Some(ts) = parse_sqlite_timestamp(s) {
                    return RowValues::Timestamp(ts);
                }
            }
            RowValues::Text(s.to_string())
        }
        (ValueRef::Blob(b), _) => RowValues::Blob(b.to_vec()),
    }
}

/// Run a prepared statement and drain its cursor into a [`ResultSet`].
///
/// Returns `Ok(None)` after executing statements that have no result columns.
/// The cursor borrows `stmt`, so it is always dropped first.
///
/// # Errors
/// Returns `DbError` if execution or any row read fails.
pub fn build_result_set(stmt: &mut Statement<'_>) -> Result<Option<ResultSet>, DbError> {
    if stmt.column_count() == 0 {
        stmt.execute([])?;
        return Ok(None);
    }

    let (column_names, decl_types): (Vec<String>, Vec<Option<String>>) = stmt
        .columns()
        .iter()
        .map(|col| (col.name().to_string(), col.decl_type().map(str::to_string)))
        .unzip();

    let mut result_set = ResultSet::with_capacity(column_names, 10);
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut row_values = Vec::with_capacity(decl_types.len());
        for (idx, decl) in decl_types.iter().enumerate() {
            row_values.push(sqlite_extract_value(row, idx, decl.as_deref())?);
        }
        result_set.add_row_values(row_values)?;
    }

    Ok(Some(result_set))
}
