//! Parquet Catalog Loading
//!
//! Reads halo catalogs stored as Apache Parquet into a [`Dataset`]. Every
//! column of the file becomes a dataset column; record batches are appended
//! in file order so row order is preserved.

use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;

use tracing::debug;

use super::error::ExportResult;
use crate::dataset::{Column, Dataset};
use crate::value::array_to_column;

/// Load a catalog from a Parquet file
pub fn load_parquet(path: &Path) -> ExportResult<Dataset> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let mut columns: Vec<(String, Column)> = schema
        .fields()
        .iter()
        .map(|field| (field.name().clone(), Vec::new()))
        .collect();

    let mut batches = 0usize;
    for batch_result in reader {
        let batch = batch_result?;
        for (idx, (name, column)) in columns.iter_mut().enumerate() {
            column.extend(array_to_column(name, batch.column(idx).as_ref())?);
        }
        batches += 1;
    }

    debug!(
        path = %path.display(),
        columns = columns.len(),
        batches,
        "parquet_catalog_loaded"
    );

    Ok(columns.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;
    use arrow::array::{Float64Array, Int64Array, RecordBatch};
    use arrow::datatypes::{DataType, Field, Schema};
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;

    #[test]
    fn test_load_parquet_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("halos.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("index", DataType::Int64, false),
            Field::new("vmax", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![0, 1, 2])),
                Arc::new(Float64Array::from(vec![120.5, 80.0, 101.0])),
            ],
        )
        .unwrap();

        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_parquet(&path).unwrap();
        assert_eq!(ds.len().unwrap(), 3);
        assert_eq!(
            ds.column("vmax").unwrap(),
            &vec![Scalar::Float(120.5), Scalar::Float(80.0), Scalar::Float(101.0)]
        );
        assert_eq!(ds.column("index").unwrap()[2], Scalar::Int(2));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_parquet(&dir.path().join("absent.parquet")).unwrap_err();
        assert!(matches!(err, crate::storage::ExportError::Io(_)));
    }
}
