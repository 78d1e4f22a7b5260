//! JSON Catalog Loading
//!
//! Accepts the column mapping a plotting front end holds for a data source:
//!
//! ```json
//! {"index": [0, 1], "host_id": ["MW", "MW"], "vmax": [120.5, 80.0]}
//! ```
//!
//! Integers become [`Scalar::Int`], other numbers [`Scalar::Float`], strings
//! [`Scalar::Str`] and `null` becomes `NaN`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value as JsonValue;

use super::error::{ExportError, ExportResult};
use crate::dataset::{Column, Dataset};
use crate::value::Scalar;

/// Load a catalog from a JSON column mapping
pub fn load_json<R: Read>(reader: R) -> ExportResult<Dataset> {
    let root: JsonValue = serde_json::from_reader(reader)?;
    let JsonValue::Object(map) = root else {
        return Err(ExportError::InvalidCatalog(
            "expected a JSON object mapping column names to arrays".to_string(),
        ));
    };

    map.into_iter()
        .map(|(name, values)| -> ExportResult<(String, Column)> {
            let column = json_to_column(&name, values)?;
            Ok((name, column))
        })
        .collect()
}

/// Load a catalog from a JSON file
pub fn load_json_file(path: &Path) -> ExportResult<Dataset> {
    let file = File::open(path)?;
    load_json(BufReader::new(file))
}

fn json_to_column(name: &str, values: JsonValue) -> ExportResult<Column> {
    let JsonValue::Array(items) = values else {
        return Err(ExportError::InvalidCatalog(format!(
            "column '{name}' is not an array"
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(row, item)| match item {
            JsonValue::Number(n) => Ok(n
                .as_i64()
                .map(Scalar::Int)
                .unwrap_or_else(|| Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))),
            JsonValue::String(s) => Ok(Scalar::Str(s)),
            JsonValue::Null => Ok(Scalar::Float(f64::NAN)),
            other => Err(ExportError::InvalidCatalog(format!(
                "column '{name}' row {row}: unsupported value {other}"
            ))),
        })
        .collect()
}
