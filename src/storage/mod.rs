//! Storage Module
//!
//! Catalog formats in and out of `halo-export`:
//! - Parquet loading (columnar catalogs written by dataframe tooling)
//! - JSON loading (column mappings held by a plotting data source)
//! - CSV serialization (the export format)
//! - Error handling
//!
//! ## Format Selection
//!
//! Input format is chosen from the file extension: `.parquet`/`.pq` or
//! `.json`. Output is always CSV.

pub mod csv;
pub mod error;
pub mod json;
pub mod parquet;

use std::path::Path;

use crate::dataset::Dataset;

// Re-export commonly used types
pub use self::csv::{
    serialize, serialize_with_options, CsvDocument, CsvOptions, CSV_MIME_TYPE, LINE_TERMINATOR,
};
pub use self::error::{ExportError, ExportResult};
pub use self::json::{load_json, load_json_file};
pub use self::parquet::load_parquet;

/// Load a catalog, picking the reader from the file extension
pub fn load_catalog(path: &Path) -> ExportResult<Dataset> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("parquet" | "pq") => load_parquet(path),
        Some("json") => load_json_file(path),
        _ => Err(ExportError::InvalidCatalog(format!(
            "cannot infer catalog format of '{}' (expected .parquet or .json)",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_catalog_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("halos.JSON");
        std::fs::write(&path, r#"{"index": [0]}"#).unwrap();
        assert_eq!(load_catalog(&path).unwrap().len().unwrap(), 1);
    }

    #[test]
    fn test_load_catalog_unknown_extension() {
        let err = load_catalog(Path::new("halos.db")).unwrap_err();
        assert!(matches!(err, ExportError::InvalidCatalog(_)));
    }
}
