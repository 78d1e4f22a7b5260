//! Column-oriented catalog data.
//!
//! A [`Dataset`] maps column names to equal-length sequences of [`Scalar`]s.
//! Equal length is not enforced on insert; it is checked whenever a schema
//! is resolved against the dataset, so catalogs can be assembled column by
//! column.

use std::collections::BTreeMap;

use crate::storage::{ExportError, ExportResult};
use crate::value::Scalar;

/// One catalog column
pub type Column = Vec<Scalar>;

/// Named columns of a halo catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: BTreeMap<String, Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column insertion
    pub fn with_column<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        self.insert_column(name, values.into_iter().map(Into::into).collect());
        self
    }

    /// Insert or replace a column, returning the previous one
    pub fn insert_column(&mut self, name: &str, values: Column) -> Option<Column> {
        self.columns.insert(name.to_string(), values)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in sorted order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Common length of every column (0 for a dataset with no columns)
    pub fn len(&self) -> ExportResult<usize> {
        let mut iter = self.columns.iter();
        let Some((_, first)) = iter.next() else {
            return Ok(0);
        };
        let expected = first.len();
        for (name, column) in iter {
            if column.len() != expected {
                return Err(ExportError::ColumnLengthMismatch {
                    column: name.clone(),
                    expected,
                    found: column.len(),
                });
            }
        }
        Ok(expected)
    }

    pub fn is_empty(&self) -> ExportResult<bool> {
        self.len().map(|n| n == 0)
    }

    /// New dataset holding only the given rows, in the given order
    pub(crate) fn take_rows(&self, rows: &[usize]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|(name, column)| {
                let picked = rows
                    .iter()
                    .filter_map(|&i| column.get(i).cloned())
                    .collect();
                (name.clone(), picked)
            })
            .collect();
        Dataset { columns }
    }
}

impl FromIterator<(String, Column)> for Dataset {
    fn from_iter<T: IntoIterator<Item = (String, Column)>>(iter: T) -> Self {
        Dataset {
            columns: iter.into_iter().collect(),
        }
    }
}
