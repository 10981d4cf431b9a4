use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use tokio_postgres::Statement;
use uuid::Uuid;

use crate::error::DbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Widen through the shortest decimal form, so `0.1::real` stays `0.1`.
pub(crate) fn widen_f32(v: f32) -> f64 {
    v.to_string().parse().unwrap_or_else(|_| f64::from(v))
}

/// `numeric` becomes a float; digits beyond f64 precision are rounded.
pub(crate) fn decimal_to_float(column: &str, d: Decimal) -> Result<f64, DbError> {
    d.to_f64().ok_or_else(|| {
        DbError::ExecutionError(format!("column `{column}`: numeric {d} does not fit in f64"))
    })
}

/// Extracts a `RowValues` from a `tokio_postgres` Row at the given index, choosing the
/// variant from the column's reported type.
///
/// # Errors
/// Returns `DbError::PostgresError` if the column cannot be read, or
/// `DbError::UnsupportedType` for types with no `RowValues` mapping.
pub fn postgres_extract_value(
    row: &tokio_postgres::Row,
    idx: usize,
) -> Result<RowValues, DbError> {
    let column = &row.columns()[idx];
    let type_name = column.type_().name();

    match type_name {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int))
        }
        "float4" => {
            let val: Option<f32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Float(widen_f32(v))))
        }
        "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float))
        }
        "numeric" => {
            let val: Option<Decimal> = row.try_get(idx)?;
            match val {
                Some(d) => Ok(RowValues::Float(decimal_to_float(column.name(), d)?)),
                None => Ok(RowValues::Null),
            }
        }
        "uuid" => {
            let val: Option<Uuid> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Text(v.hyphenated().to_string())))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Bool))
        }
        "timestamp" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Timestamp))
        }
        // Rendered with UTC wall-clock fields.
        "timestamptz" => {
            let val: Option<DateTime<Utc>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Timestamp(v.naive_utc())))
        }
        "date" => {
            let val: Option<NaiveDate> = row.try_get(idx)?;
            Ok(val
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map_or(RowValues::Null, RowValues::Timestamp))
        }
        "json" | "jsonb" => {
            let val: Option<Value> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::JSON))
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Blob))
        }
        _ => match row.try_get::<_, Option<String>>(idx) {
            Ok(val) => Ok(val.map_or(RowValues::Null, RowValues::Text)),
            Err(_) => Err(DbError::UnsupportedType {
                column: column.name().to_string(),
                type_name: type_name.to_string(),
            }),
        },
    }
}

/// Build a result set using statement metadata for column names.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_result_set_from_statement(
    stmt: &Statement,
    rows: &[tokio_postgres::Row],
) -> Result<ResultSet, DbError> {
    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(column_names, rows.len());
    for row in rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values)?;
    }

    Ok(result_set)
}
