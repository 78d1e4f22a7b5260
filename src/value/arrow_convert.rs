//! Arrow Conversion Utilities
//!
//! Converts Arrow arrays read from columnar catalog files into [`Column`]s.

use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    Int8Array, LargeStringArray, StringArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::DataType as ArrowDataType;

use super::Scalar;
use crate::dataset::Column;
use crate::storage::{ExportError, ExportResult};

/// Convert one Arrow array into a catalog column
///
/// Integer types map to [`Scalar::Int`] (unsigned 64-bit values beyond
/// `i64::MAX` fall back to floats), floating types to [`Scalar::Float`],
/// strings to [`Scalar::Str`] and booleans to `0`/`1`. Null slots become
/// `NaN`, the same marker dataframes use for missing catalog values.
pub fn array_to_column(name: &str, array: &dyn Array) -> ExportResult<Column> {
    let column = match array.data_type() {
        ArrowDataType::Int8 => collect::<Int8Array>(array, |a, i| Scalar::Int(a.value(i).into())),
        ArrowDataType::Int16 => {
            collect::<Int16Array>(array, |a, i| Scalar::Int(a.value(i).into()))
        }
        ArrowDataType::Int32 => {
            collect::<Int32Array>(array, |a, i| Scalar::Int(a.value(i).into()))
        }
        ArrowDataType::Int64 => collect::<Int64Array>(array, |a, i| Scalar::Int(a.value(i))),
        ArrowDataType::UInt8 => {
            collect::<UInt8Array>(array, |a, i| Scalar::Int(a.value(i).into()))
        }
        ArrowDataType::UInt16 => {
            collect::<UInt16Array>(array, |a, i| Scalar::Int(a.value(i).into()))
        }
        ArrowDataType::UInt32 => {
            collect::<UInt32Array>(array, |a, i| Scalar::Int(a.value(i).into()))
        }
        ArrowDataType::UInt64 => collect::<UInt64Array>(array, |a, i| {
            let v = a.value(i);
            i64::try_from(v).map_or(Scalar::Float(v as f64), Scalar::Int)
        }),
        ArrowDataType::Float32 => {
            collect::<Float32Array>(array, |a, i| Scalar::Float(a.value(i).into()))
        }
        ArrowDataType::Float64 => collect::<Float64Array>(array, |a, i| Scalar::Float(a.value(i))),
        ArrowDataType::Utf8 => {
            collect::<StringArray>(array, |a, i| Scalar::Str(a.value(i).to_string()))
        }
        ArrowDataType::LargeUtf8 => {
            collect::<LargeStringArray>(array, |a, i| Scalar::Str(a.value(i).to_string()))
        }
        ArrowDataType::Boolean => {
            collect::<BooleanArray>(array, |a, i| Scalar::Int(i64::from(a.value(i))))
        }
        other => {
            return Err(ExportError::UnsupportedColumnType {
                column: name.to_string(),
                data_type: other.to_string(),
            })
        }
    };

    column.ok_or_else(|| {
        ExportError::InvalidCatalog(format!(
            "column '{name}' does not match its declared type"
        ))
    })
}

fn collect<A>(array: &dyn Array, cell: impl Fn(&A, usize) -> Scalar) -> Option<Column>
where
    A: Array + 'static,
{
    let typed = array.as_any().downcast_ref::<A>()?;
    Some(
        (0..typed.len())
            .map(|i| {
                if typed.is_null(i) {
                    Scalar::Float(f64::NAN)
                } else {
                    cell(typed, i)
                }
            })
            .collect(),
    )
}
