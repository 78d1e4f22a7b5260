//! # Catalog Export
//!
//! The [`Exporter`] turns a dataset into CSV and hands the bytes to a
//! [`FileSaver`] exactly once per request.
//!
//! ## Flow
//!
//! ```text
//! ExportRequest{filename, dataset, schema}
//!     |  trigger()
//!     v
//! serialize (all preconditions checked, no partial output)
//!     |
//!     v
//! CsvBlob (text/csv; charset=utf-8)
//!     |
//!     v
//! FileSaver::save(blob, filename)   fire-and-forget
//! ```
//!
//! Save failures happen on the host side of the hand-off. They are logged and
//! not reported back to the caller.
//!
//! ```rust,ignore
//! use halo_export::{Config, Dataset, Exporter, Schema};
//!
//! let exporter = Exporter::from_config(&Config::default().export)?;
//! exporter.export(&dataset, &Schema::reduced(), "subhalos.csv")?;
//! ```

pub mod saver;

pub use saver::{detect_saver, CsvBlob, DirectSaver, FileSaver, StagedSaver};

use std::io;

use tracing::{info, warn};

use crate::config::ExportConfig;
use crate::dataset::Dataset;
use crate::schema::Schema;
use crate::storage::{serialize_with_options, CsvDocument, CsvOptions, ExportResult};

/// Serializes catalogs and hands them to a save capability
pub struct Exporter {
    saver: Box<dyn FileSaver>,
    options: CsvOptions,
}

impl Exporter {
    /// Exporter backed by an explicit saver
    pub fn new(saver: impl FileSaver + 'static) -> Self {
        Exporter {
            saver: Box::new(saver),
            options: CsvOptions::default(),
        }
    }

    /// Exporter backed by the saver detected for `config`
    pub fn from_config(config: &ExportConfig) -> ExportResult<Self> {
        Ok(Exporter {
            saver: detect_saver(config)?,
            options: CsvOptions::default(),
        })
    }

    pub fn with_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    pub fn saver_name(&self) -> &'static str {
        self.saver.name()
    }

    /// Serialize `dataset` with this exporter's CSV options
    pub fn serialize(&self, dataset: &Dataset, schema: &Schema) -> ExportResult<CsvDocument> {
        serialize_with_options(dataset, schema, &self.options)
    }

    /// Hand `document` to the saver under `filename`
    ///
    /// Fire-and-forget: a failed save is logged and not reported.
    pub fn export_to_file(&self, document: CsvDocument, filename: &str) {
        if let Err(e) = self.try_export_to_file(document, filename) {
            warn!(
                filename,
                saver = self.saver.name(),
                error = %e,
                "export_save_failed"
            );
        }
    }

    /// Like [`Exporter::export_to_file`], but returns the saver's outcome
    pub fn try_export_to_file(&self, document: CsvDocument, filename: &str) -> io::Result<()> {
        let rows = document.row_count();
        let blob = CsvBlob::new(document);
        self.saver.save(&blob, filename)?;
        info!(
            filename,
            rows,
            bytes = blob.len(),
            saver = self.saver.name(),
            "export_handed_off"
        );
        Ok(())
    }

    /// Serialize and export in one step
    pub fn export(&self, dataset: &Dataset, schema: &Schema, filename: &str) -> ExportResult<()> {
        ExportRequest::new(filename, dataset, schema).trigger(self)
    }
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("saver", &self.saver.name())
            .field("options", &self.options)
            .finish()
    }
}

/// A single user-initiated export
///
/// Borrows the dataset for the duration of serialization only. Triggering
/// consumes the request, so it can start at most one save.
#[derive(Debug)]
pub struct ExportRequest<'a> {
    filename: String,
    dataset: &'a Dataset,
    schema: &'a Schema,
}

impl<'a> ExportRequest<'a> {
    pub fn new(filename: impl Into<String>, dataset: &'a Dataset, schema: &'a Schema) -> Self {
        ExportRequest {
            filename: filename.into(),
            dataset,
            schema,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Serialize, then hand off; nothing is saved if serialization fails
    pub fn trigger(self, exporter: &Exporter) -> ExportResult<()> {
        let document = exporter.serialize(self.dataset, self.schema)?;
        exporter.export_to_file(document, &self.filename);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        saves: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl FileSaver for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn save(&self, blob: &CsvBlob, filename: &str) -> io::Result<()> {
            self.saves
                .lock()
                .unwrap()
                .push((filename.to_string(), blob.bytes().to_vec()));
            Ok(())
        }
    }

    struct Failing;

    impl FileSaver for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn save(&self, _blob: &CsvBlob, _filename: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_request_saves_once() {
        let recorder = Arc::new(Recorder::default());
        let exporter = Exporter::new(recorder.clone());
        let ds = Dataset::new().with_column("index", [3, 1]);
        let schema = Schema::new(["index"]).unwrap();

        let request = ExportRequest::new("a b/c?.txt", &ds, &schema);
        assert_eq!(request.filename(), "a b/c?.txt");
        request.trigger(&exporter).unwrap();

        let saves = recorder.saves.lock().unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].0, "a b/c?.txt");
        assert_eq!(saves[0].1, b"index\n3\n1\n");
    }

    #[test]
    fn test_failed_serialization_saves_nothing() {
        let recorder = Arc::new(Recorder::default());
        let exporter = Exporter::new(recorder.clone());
        let ds = Dataset::new().with_column("index", [0]);

        assert!(exporter.export(&ds, &Schema::reduced(), "halos.csv").is_err());
        assert!(recorder.saves.lock().unwrap().is_empty());
    }

    #[test]
    fn test_save_failure_is_not_surfaced() {
        let exporter = Exporter::new(Failing);
        let ds = Dataset::new().with_column("index", [0]);
        let schema = Schema::new(["index"]).unwrap();
        assert!(exporter.export(&ds, &schema, "halos.csv").is_ok());
        assert_eq!(exporter.saver_name(), "failing");
    }

    #[test]
    fn test_checked_export_reports_save_failure() {
        let exporter = Exporter::new(Failing);
        let ds = Dataset::new().with_column("index", [0]);
        let doc = exporter
            .serialize(&ds, &Schema::new(["index"]).unwrap())
            .unwrap();
        let err = exporter.try_export_to_file(doc, "halos.csv").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_checked_export_saves_once() {
        let recorder = Arc::new(Recorder::default());
        let exporter = Exporter::new(recorder.clone());
        let ds = Dataset::new().with_column("index", [4]);
        let doc = exporter
            .serialize(&ds, &Schema::new(["index"]).unwrap())
            .unwrap();
        exporter.try_export_to_file(doc, "one.csv").unwrap();
        assert_eq!(recorder.saves.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_options_flow_through() {
        let recorder = Arc::new(Recorder::default());
        let exporter = Exporter::new(recorder.clone()).with_options(CsvOptions {
            delimiter: '\t',
            has_header: true,
        });
        let ds = Dataset::new().with_column("x", [1]).with_column("y", [2]);
        let schema = Schema::new(["x", "y"]).unwrap();
        exporter.export(&ds, &schema, "t.tsv").unwrap();
        assert_eq!(recorder.saves.lock().unwrap()[0].1, b"x\ty\n1\t2\n");
    }
}
