//! # halo-export
//!
//! Serializes columnar halo catalogs (identifiers, masses, positions,
//! velocities, distances) to CSV and hands the result to a file save
//! capability.
//!
//! ## Pipeline
//!
//! ```text
//! catalog file (Parquet / JSON)
//!     ↓
//! [storage::load_catalog]       → Dataset
//!     ↓
//! [Selection::apply] (optional) → Dataset (matching rows, order kept)
//!     ↓
//! [schema::validate]            → columns in schema order
//!     ↓
//! [storage::serialize]          → CsvDocument
//!     ↓
//! [Exporter::export_to_file]    → FileSaver (direct or staged)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use halo_export::{Config, Dataset, Exporter, Schema};
//!
//! let dataset = Dataset::new()
//!     .with_column("index", [0, 1])
//!     .with_column("host_id", [5, 5])
//!     .with_column("x", [1.0, 2.0]);
//!
//! let csv = halo_export::serialize(&dataset, &Schema::new(["index", "host_id", "x"])?)?;
//! assert_eq!(csv.as_str(), "index,host_id,x\n0,5,1\n1,5,2\n");
//!
//! let exporter = Exporter::from_config(&Config::load()?.export)?;
//! exporter.export_to_file(csv, "halos.csv");
//! ```
//!
//! ## Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `value` | Scalar cells and their canonical text form |
//! | `dataset` | Column-oriented catalog |
//! | `schema` | Ordered column lists and validation |
//! | `selection` | `where`-style row filters |
//! | `storage` | Catalog loading, CSV serialization, errors |
//! | `export` | Exporter, export requests, file savers |
//! | `config` | Hierarchical configuration |
//! | `cli` | Flag resolution and the command-line export run |

pub mod cli;
pub mod config;
pub mod dataset;
pub mod export;
pub mod schema;
pub mod selection;
pub mod storage;
pub mod value;

pub use config::{Config, ExportConfig, LoggingConfig, SaveMode};
pub use dataset::{Column, Dataset};
pub use export::{
    detect_saver, CsvBlob, DirectSaver, ExportRequest, Exporter, FileSaver, StagedSaver,
};
pub use schema::{Schema, SchemaKind};
pub use selection::Selection;
pub use storage::{
    load_catalog, serialize, serialize_with_options, CsvDocument, CsvOptions, ExportError,
    ExportResult,
};
pub use value::Scalar;
