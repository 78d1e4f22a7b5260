//! # Row Selection
//!
//! Filters a catalog with a conjunctive predicate, the way the catalog
//! browser narrows a full catalog to a "query" download:
//!
//! ```text
//! where vmax > 100 and dist < 100
//! host_id = "MW" and infall >= 4.5
//! ```
//!
//! The leading `where` is optional; `and` is case-insensitive. Operators are
//! `<`, `<=`, `>`, `>=`, `=`/`==` and `!=`. Literals are numbers or quoted
//! strings; a quoted string may itself contain ` and `. Empty text selects
//! every row.
//!
//! Numbers compare as `f64`, strings compare lexically, and a string never
//! matches a number (in either direction, for every operator).

use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::dataset::Dataset;
use crate::storage::{ExportError, ExportResult};
use crate::value::Scalar;

const CONDITION_PATTERN: &str =
    r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*(<=|>=|==|!=|<|>|=)\s*(.+?)\s*$";
const CONJUNCTION_PATTERN: &str = r"(?i)\s+and\s+";
const WHERE_PATTERN: &str = r"(?i)^\s*where(\s+|$)";

static CONDITION: OnceLock<Regex> = OnceLock::new();
static CONJUNCTION: OnceLock<Regex> = OnceLock::new();
static WHERE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> ExportResult<&'static Regex> {
    if let Some(re) = cell.get() {
        return Ok(re);
    }
    let re = Regex::new(pattern).map_err(|e| ExportError::InvalidSelection(e.to_string()))?;
    Ok(cell.get_or_init(|| re))
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            "=" | "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            _ => None,
        }
    }

    fn holds<T: PartialOrd>(self, left: &T, right: &T) -> bool {
        match self {
            CompareOp::Lt => left < right,
            CompareOp::Le => left <= right,
            CompareOp::Gt => left > right,
            CompareOp::Ge => left >= right,
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
        }
    }
}

/// Literal on the right-hand side of a condition
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

/// `column op literal`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub op: CompareOp,
    pub literal: Literal,
}

impl Condition {
    fn matches(&self, cell: &Scalar) -> bool {
        match (&self.literal, cell) {
            (Literal::Text(want), Scalar::Str(have)) => {
                self.op.holds(&have.as_str(), &want.as_str())
            }
            (Literal::Number(want), _) => cell
                .as_f64()
                .is_some_and(|have| self.op.holds(&have, want)),
            (Literal::Text(_), _) => false,
        }
    }
}

/// Conjunction of conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    conditions: Vec<Condition>,
}

impl Selection {
    /// Selection that keeps every row
    pub fn all() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> ExportResult<Self> {
        let body = compiled(&WHERE, WHERE_PATTERN)?.replace(text, "");
        let body = body.trim();
        if body.is_empty() {
            return Ok(Self::all());
        }

        let condition_re = compiled(&CONDITION, CONDITION_PATTERN)?;
        let conditions = split_conjunction(compiled(&CONJUNCTION, CONJUNCTION_PATTERN)?, body)
            .into_iter()
            .map(|part| parse_condition(condition_re, part))
            .collect::<ExportResult<Vec<_>>>()?;

        Ok(Selection { conditions })
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// True when every row is kept
    pub fn is_all(&self) -> bool {
        self.conditions.is_empty()
    }

    /// New dataset with the matching rows, input order preserved
    pub fn apply(&self, dataset: &Dataset) -> ExportResult<Dataset> {
        let total = dataset.len()?;

        let columns = self
            .conditions
            .iter()
            .map(|c| {
                dataset
                    .column(&c.column)
                    .ok_or_else(|| ExportError::SchemaMismatch {
                        column: c.column.clone(),
                    })
            })
            .collect::<ExportResult<Vec<_>>>()?;

        let rows: Vec<usize> = (0..total)
            .filter(|&row| {
                self.conditions
                    .iter()
                    .zip(&columns)
                    .all(|(condition, column)| condition.matches(&column[row]))
            })
            .collect();

        debug!(selected = rows.len(), total, selection = %self, "selection_applied");
        Ok(dataset.take_rows(&rows))
    }
}

/// Split on `and` keywords that sit outside quoted literals
fn split_conjunction<'t>(re: &Regex, body: &'t str) -> Vec<&'t str> {
    let quoted = quoted_spans(body);
    let mut parts = Vec::new();
    let mut start = 0;
    for m in re.find_iter(body) {
        if quoted.iter().any(|span| span.contains(&m.start())) {
            continue;
        }
        parts.push(&body[start..m.start()]);
        start = m.end();
    }
    parts.push(&body[start..]);
    parts
}

/// Byte ranges from each opening quote up to its closing quote
fn quoted_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut open: Option<(char, usize)> = None;
    for (i, c) in text.char_indices() {
        match open {
            Some((quote, start)) if c == quote => {
                spans.push(start..i);
                open = None;
            }
            None if c == '"' || c == '\'' => open = Some((c, i)),
            _ => {}
        }
    }
    // unterminated quote runs to the end; the literal is rejected later
    if let Some((_, start)) = open {
        spans.push(start..text.len());
    }
    spans
}

fn parse_condition(re: &Regex, text: &str) -> ExportResult<Condition> {
    let caps = re.captures(text).ok_or_else(|| {
        ExportError::InvalidSelection(format!("cannot parse condition '{}'", text.trim()))
    })?;

    let column = caps[1].to_string();
    let op = CompareOp::parse(&caps[2]).ok_or_else(|| {
        ExportError::InvalidSelection(format!("unknown operator '{}'", &caps[2]))
    })?;
    let literal = parse_literal(&caps[3])?;

    Ok(Condition {
        column,
        op,
        literal,
    })
}

fn parse_literal(text: &str) -> ExportResult<Literal> {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return Ok(Literal::Text(inner.to_string()));
        }
    }
    text.parse::<f64>().map(Literal::Number).map_err(|_| {
        ExportError::InvalidSelection(format!(
            "'{text}' is neither a number nor a quoted string"
        ))
    })
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return f.write_str("all");
        }
        for (i, c) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            match &c.literal {
                Literal::Number(n) => {
                    write!(f, "{} {} {}", c.column, c.op.symbol(), Scalar::Float(*n))?;
                }
                Literal::Text(s) => write!(f, "{} {} \"{}\"", c.column, c.op.symbol(), s)?,
            }
        }
        Ok(())
    }
}
