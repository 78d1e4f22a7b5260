//! # Scalar Values
//!
//! Catalog cells are integers, floats or strings. Each has a canonical text
//! form used verbatim as a CSV field.
//!
//! ## Number formatting
//!
//! Numbers print the way a browser's `Number#toString` does, so exported
//! catalogs match what the plotting front end shows:
//!
//! | value      | text            |
//! |------------|-----------------|
//! | `1.0`      | `1`             |
//! | `0.1`      | `0.1`           |
//! | `1e10`     | `10000000000`   |
//! | `1e21`     | `1e+21`         |
//! | `1.5e-7`   | `1.5e-7`        |
//! | `-0.0`     | `0`             |
//! | `NaN`      | `NaN`           |
//! | `+inf`     | `Infinity`      |

pub mod arrow_convert;

pub use arrow_convert::array_to_column;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal notation is used for magnitudes in `[1e-6, 1e21)`.
const EXPONENT_UPPER: f64 = 1e21;
const EXPONENT_LOWER: f64 = 1e-6;

/// A single catalog cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Integer identifiers and counts
    Int(i64),
    /// Masses, positions, velocities, distances
    Float(f64),
    /// Free text (host labels and the like)
    Str(String),
}

impl Scalar {
    /// Numeric view used by selections; strings have none
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            Scalar::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Scalar::Str(_))
    }

    /// Canonical text form of this cell
    pub fn to_field(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write_number(f, *v),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("NaN");
    }
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if v == 0.0 {
        // covers -0.0
        return f.write_str("0");
    }

    let magnitude = v.abs();
    if (EXPONENT_LOWER..EXPONENT_UPPER).contains(&magnitude) {
        return write!(f, "{v}");
    }

    // `{:e}` gives shortest round-trip digits, e.g. "1.5e-7" or "1e21"
    let text = format!("{v:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
        _ => f.write_str(&text),
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(i64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(f64::from(v))
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}
