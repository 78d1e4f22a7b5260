//! # Export Schemas
//!
//! A schema is an ordered list of column names. It fixes both the CSV header
//! text and the order of fields in every row.
//!
//! Two catalog layouts are built in:
//!
//! - **extended** (18 columns): full halo properties including velocities and
//!   the peak-velocity scale factor
//! - **reduced** (14 columns): positions, distances and orbital quantities
//!
//! ```rust,ignore
//! use halo_export::schema::{Schema, SchemaKind};
//!
//! let schema = Schema::from(SchemaKind::Reduced);
//! assert_eq!(schema.len(), 14);
//! ```

pub mod validator;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::{ExportError, ExportResult};

pub use validator::{validate, ResolvedColumns};

/// Column order of the extended halo catalog
pub const EXTENDED_COLUMNS: [&str; 18] = [
    "index",
    "host_id",
    "id",
    "mass",
    "rs",
    "rvir",
    "vmax",
    "vx",
    "vy",
    "vz",
    "x",
    "y",
    "z",
    "vpeak",
    "scale_vpeak",
    "dist",
    "infall",
    "peri",
];

/// Column order of the reduced halo catalog
pub const REDUCED_COLUMNS: [&str; 14] = [
    "index", "host_id", "x", "y", "z", "dist", "rvir", "mvir", "vmax", "vpeak", "vtan", "vr",
    "infall", "peri",
];

/// Built-in schema selector, used by config and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    #[default]
    Extended,
    Reduced,
}

impl FromStr for SchemaKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "extended" | "a" => Ok(SchemaKind::Extended),
            "reduced" | "b" => Ok(SchemaKind::Reduced),
            other => Err(ExportError::InvalidSchema(format!(
                "unknown schema '{other}' (expected 'extended' or 'reduced')"
            ))),
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Extended => f.write_str("extended"),
            SchemaKind::Reduced => f.write_str("reduced"),
        }
    }
}

/// Ordered column list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Custom schema; names must be non-empty and unique
    pub fn new<I, S>(names: I) -> ExportResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = names.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(ExportError::InvalidSchema(
                "schema must name at least one column".to_string(),
            ));
        }
        for (i, name) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(ExportError::InvalidSchema(format!(
                    "column {i} has an empty name"
                )));
            }
            if columns[..i].contains(name) {
                return Err(ExportError::InvalidSchema(format!(
                    "column '{name}' appears more than once"
                )));
            }
        }
        Ok(Schema { columns })
    }

    /// 18-column halo catalog
    pub fn extended() -> Self {
        Self::from_static(&EXTENDED_COLUMNS)
    }

    /// 14-column halo catalog
    pub fn reduced() -> Self {
        Self::from_static(&REDUCED_COLUMNS)
    }

    fn from_static(names: &[&str]) -> Self {
        Schema {
            columns: names.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Header text without the line terminator
    pub fn header(&self, delimiter: char) -> String {
        self.columns.join(&delimiter.to_string())
    }
}

impl From<SchemaKind> for Schema {
    fn from(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::Extended => Schema::extended(),
            SchemaKind::Reduced => Schema::reduced(),
        }
    }
}
