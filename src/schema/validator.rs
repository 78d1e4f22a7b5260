//! # Schema Resolution
//!
//! Resolves a [`Schema`] against a [`Dataset`] before any output is built:
//! - every schema column must exist
//! - every schema column must have the same length
//! - no string cell may contain the delimiter, a quote or a line break
//!
//! All checks run to completion before serialization starts, so a failing
//! export never produces partial CSV text.

use super::Schema;
use crate::dataset::{Column, Dataset};
use crate::storage::{ExportError, ExportResult};
use crate::value::Scalar;

/// Schema columns borrowed from a dataset, in schema order
#[derive(Debug)]
pub struct ResolvedColumns<'a> {
    pub names: &'a [String],
    pub columns: Vec<&'a Column>,
    pub rows: usize,
}

/// Check `dataset` against `schema` and borrow the columns in schema order
pub fn validate<'a>(
    dataset: &'a Dataset,
    schema: &'a Schema,
    delimiter: char,
) -> ExportResult<ResolvedColumns<'a>> {
    let names = schema.columns();

    let columns = names
        .iter()
        .map(|name| {
            dataset
                .column(name)
                .ok_or_else(|| ExportError::SchemaMismatch {
                    column: name.clone(),
                })
        })
        .collect::<ExportResult<Vec<_>>>()?;

    let rows = columns.first().map_or(0, |c| c.len());
    for (name, column) in names.iter().zip(&columns) {
        if column.len() != rows {
            return Err(ExportError::ColumnLengthMismatch {
                column: name.clone(),
                expected: rows,
                found: column.len(),
            });
        }
    }

    for (name, column) in names.iter().zip(&columns) {
        if let Some(row) = column.iter().position(|v| breaks_framing(v, delimiter)) {
            return Err(ExportError::UnrepresentableField {
                column: name.clone(),
                row,
            });
        }
    }

    Ok(ResolvedColumns {
        names,
        columns,
        rows,
    })
}

fn breaks_framing(value: &Scalar, delimiter: char) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.contains([delimiter, '"', '\r', '\n']))
}
