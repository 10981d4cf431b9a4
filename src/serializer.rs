use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDateTime;
use serde_json::{Map, Number, Value};

use crate::config::BridgeOptions;
use crate::error::BridgeError;
use crate::results::{JsonRow, RowSet};
use crate::types::{BinaryEncoding, NullFields, RowValues};

/// Wall-clock fields with millisecond precision and a literal `Z`. No zone conversion.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Render a timestamp with [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Turns a [`RowSet`] into a JSON array of objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowSerializer {
    options: BridgeOptions,
}

impl RowSerializer {
    #[must_use]
    pub fn new(options: BridgeOptions) -> Self {
        Self { options }
    }

    /// Serialize all rows, in order, as a compact JSON array.
    ///
    /// # Errors
    /// Returns `BridgeError::Serialization` for values with no JSON form: non-finite
    /// floats, and binary values under [`BinaryEncoding::Reject`].
    pub fn to_json(&self, rows: &RowSet) -> Result<String, BridgeError> {
        let value = self.to_value(rows)?;
        Ok(serde_json::to_string(&value)?)
    }

    /// Same as [`RowSerializer::to_json`] but returns the JSON tree.
    ///
    /// # Errors
    /// See [`RowSerializer::to_json`].
    pub fn to_value(&self, rows: &RowSet) -> Result<Value, BridgeError> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(self.row_to_value(row)?);
        }
        Ok(Value::Array(out))
    }

    fn row_to_value(&self, row: &JsonRow) -> Result<Value, BridgeError> {
        let mut object = Map::new();
        for (name, value) in row.iter() {
            if value.is_null() && self.options.null_fields == NullFields::Omit {
                continue;
            }
            let json = self
                .value_to_json(value)
                .map_err(|msg| BridgeError::Serialization(format!("column `{name}`: {msg}")))?;
            object.insert(name.to_string(), json);
        }
        Ok(Value::Object(object))
    }

    fn value_to_json(&self, value: &RowValues) -> Result<Value, String> {
        match value {
            RowValues::Null => Ok(Value::Null),
            RowValues::Int(i) => Ok(Value::from(*i)),
            RowValues::Float(f) => Number::from_f64(*f)
                .map(Value::Number)
                .ok_or_else(|| format!("{f} is not a finite number")),
            RowValues::Text(s) => Ok(Value::String(s.clone())),
            RowValues::Bool(b) => Ok(Value::Bool(*b)),
            RowValues::Timestamp(ts) => Ok(Value::String(format_timestamp(ts))),
            RowValues::JSON(v) => Ok(v.clone()),
            RowValues::Blob(bytes) => match self.options.binary_encoding {
                BinaryEncoding::Array => Ok(Value::Array(
                    bytes.iter().map(|b| Value::from(*b)).collect(),
                )),
                BinaryEncoding::Base64 => Ok(Value::String(BASE64.encode(bytes))),
                BinaryEncoding::Reject => Err(format!(
                    "binary value of {} bytes has no JSON representation",
                    bytes.len()
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ResultSet;
    use chrono::NaiveDate;

    fn row_set(columns: &[&str], rows: Vec<Vec<RowValues>>) -> RowSet {
        let mut rs = ResultSet::new(columns.iter().map(ToString::to_string).collect());
        for row in rows {
            rs.add_row_values(row).unwrap();
        }
        rs.into_row_set()
    }

    #[test]
    fn timestamp_uses_fixed_pattern() {
        let ts = NaiveDate::from_ymd_opt(2021, 7, 4)
            .unwrap()
            .and_hms_milli_opt(9, 5, 1, 250)
            .unwrap();
        assert_eq!(format_timestamp(&ts), "2021-07-04T09:05:01.250Z");

        let whole = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(format_timestamp(&whole), "1999-12-31T23:59:59.000Z");
    }

    #[test]
    fn timestamp_truncates_sub_millisecond_digits() {
        let ts = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_micro_opt(3, 4, 5, 678_999)
            .unwrap();
        assert_eq!(format_timestamp(&ts), "2020-01-02T03:04:05.678Z");
    }

    #[test]
    fn empty_set_is_empty_array() {
        let rows = row_set(&["a"], vec![]);
        assert_eq!(RowSerializer::default().to_json(&rows).unwrap(), "[]");
    }

    #[test]
    fn scalar_values_map_directly() {
        let rows = row_set(
            &["i", "f", "s", "b", "n"],
            vec![vec![
                RowValues::Int(-3),
                RowValues::Float(2.5),
                RowValues::Text("hi \"there\"".into()),
                RowValues::Bool(true),
                RowValues::Null,
            ]],
        );
        let json = RowSerializer::default().to_json(&rows).unwrap();
        assert_eq!(
            json,
            r#"[{"b":true,"f":2.5,"i":-3,"n":null,"s":"hi \"there\""}]"#
        );
    }

    #[test]
    fn omit_null_fields_drops_keys() {
        let rows = row_set(
            &["a", "b"],
            vec![vec![RowValues::Int(1), RowValues::Null]],
        );
        let opts = BridgeOptions::new().with_null_fields(NullFields::Omit);
        let json = RowSerializer::new(opts).to_json(&rows).unwrap();
        assert_eq!(json, r#"[{"a":1}]"#);
    }

    #[test]
    fn binary_encodings() {
        let rows = row_set(&["bin"], vec![vec![RowValues::Blob(vec![0, 127, 255])]]);

        let array = RowSerializer::default().to_json(&rows).unwrap();
        assert_eq!(array, r#"[{"bin":[0,127,255]}]"#);

        let b64 = RowSerializer::new(BridgeOptions::new().with_binary_encoding(BinaryEncoding::Base64))
            .to_json(&rows)
            .unwrap();
        assert_eq!(b64, r#"[{"bin":"AH//"}]"#);

        let err = RowSerializer::new(BridgeOptions::new().with_binary_encoding(BinaryEncoding::Reject))
            .to_json(&rows)
            .unwrap_err();
        assert!(matches!(err, BridgeError::Serialization(ref m) if m.contains("bin")));
    }

    #[test]
    fn non_finite_float_is_a_serialization_error() {
        let rows = row_set(&["f"], vec![vec![RowValues::Float(f64::NAN)]]);
        let err = RowSerializer::default().to_json(&rows).unwrap_err();
        assert!(matches!(err, BridgeError::Serialization(_)));
    }

    #[test]
    fn json_values_are_embedded() {
        let rows = row_set(
            &["doc"],
            vec![vec![RowValues::JSON(serde_json::json!({"k": [1, 2]}))]],
        );
        let json = RowSerializer::default().to_json(&rows).unwrap();
        assert_eq!(json, r#"[{"doc":{"k":[1,2]}}]"#);
    }
}
