//! CSV Serialization Module
//!
//! Turns a column-oriented [`Dataset`] into CSV text in the field order of a
//! [`Schema`].
//!
//! ## Format
//!
//! - First line is the header: schema column names joined by the delimiter
//! - One line per record, in dataset index order
//! - Every line, including the last, ends with `\n`
//! - Fields are written unquoted in their canonical text form
//!
//! ## Example
//!
//! ```csv
//! index,host_id,x,y,z
//! 0,5,1,0,0
//! 1,5,2,0,0
//! ```

use std::fmt::Write as _;

use tracing::debug;

use crate::dataset::Dataset;
use crate::schema::{validate, Schema};
use crate::storage::error::ExportResult;

/// Line terminator used for every CSV line
pub const LINE_TERMINATOR: &str = "\n";

/// MIME type attached to exported documents
pub const CSV_MIME_TYPE: &str = "text/csv; charset=utf-8";

/// Options for CSV serialization
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: char,
    /// Whether to emit the header line (default: true)
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: ',',
            has_header: true,
        }
    }
}

/// A complete CSV document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    text: String,
    rows: usize,
    has_header: bool,
}

impl CsvDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_bytes()
    }

    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of lines, header included
    pub fn line_count(&self) -> usize {
        self.rows + usize::from(self.has_header)
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl AsRef<str> for CsvDocument {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Serialize `dataset` with the columns of `schema`
///
/// # Returns
/// * `Ok(CsvDocument)` - header plus one line per record
/// * `Err(ExportError)` - a schema column is missing, lengths disagree, or a
///   string value would break the CSV framing
pub fn serialize(dataset: &Dataset, schema: &Schema) -> ExportResult<CsvDocument> {
    serialize_with_options(dataset, schema, &CsvOptions::default())
}

/// Serialize with custom options
pub fn serialize_with_options(
    dataset: &Dataset,
    schema: &Schema,
    options: &CsvOptions,
) -> ExportResult<CsvDocument> {
    let resolved = validate(dataset, schema, options.delimiter)?;

    let mut text = String::new();

    if options.has_header {
        text.push_str(&schema.header(options.delimiter));
        text.push_str(LINE_TERMINATOR);
    }

    for row in 0..resolved.rows {
        for (i, column) in resolved.columns.iter().enumerate() {
            if i > 0 {
                text.push(options.delimiter);
            }
            // Writing into a String cannot fail
            let _ = write!(text, "{}", column[row]);
        }
        text.push_str(LINE_TERMINATOR);
    }

    debug!(
        rows = resolved.rows,
        columns = resolved.names.len(),
        bytes = text.len(),
        "csv_serialized"
    );

    Ok(CsvDocument {
        text,
        rows: resolved.rows,
        has_header: options.has_header,
    })
}
