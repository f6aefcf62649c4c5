//! Domain models for the TTD sheet transformation pipeline.
//!
//! - [`CellValue`] - A scalar read from (or written to) a worksheet cell
//! - [`SheetLayout`] - The three header rows plus the data block of the input sheet
//! - [`OutputTable`] - The reshaped table ready for serialization

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Cell Values
// =============================================================================

/// A single worksheet cell.
///
/// Serializes untagged so `inspect` output reads like the sheet itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Whether the cell holds nothing at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text used for header matching: trimmed and case-folded.
    pub fn normalized(&self) -> String {
        self.to_string().trim().to_lowercase()
    }

    /// Numeric view of the cell, if it has one.
    ///
    /// Strings count as numbers when their trimmed text parses as one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            // Whole floats print without a fraction so "5" and 5.0 match alike
            CellValue::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            CellValue::Float(n) => write!(f, "{}", n),
            CellValue::String(s) => f.write_str(s),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

// =============================================================================
// Input Layout
// =============================================================================

/// The parsed input worksheet.
///
/// `row1` and `row2` are padded to `column_count`; `data` rows span the same
/// columns. Records are positional, keyed by `row1` through [`SheetLayout::column_index`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct SheetLayout {
    /// Source column names.
    pub row1: Vec<CellValue>,
    /// Mapping directives, aligned with `row1`.
    pub row2: Vec<CellValue>,
    /// Destination column names.
    pub row3: Vec<CellValue>,
    /// Data records (sheet rows 4 and below).
    pub data: Vec<Vec<CellValue>>,
    /// Worksheet's maximum column count.
    pub column_count: usize,
}

impl SheetLayout {
    /// Index of the source column whose name is exactly `name`.
    ///
    /// Duplicate names resolve to the last occurrence.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.row1
            .iter()
            .rposition(|h| matches!(h, CellValue::String(s) if s == name))
    }

    /// Cell of `record` in column `col`, empty when the record is short.
    pub fn cell<'a>(record: &'a [CellValue], col: usize) -> &'a CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        record.get(col).unwrap_or(&EMPTY)
    }
}

// =============================================================================
// Output Table
// =============================================================================

/// One materialized output column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputColumn {
    /// Destination header (the row 3 value).
    pub header: CellValue,
    /// One value per input record.
    pub values: Vec<CellValue>,
}

/// Output of the row transformer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputTable {
    /// Columns in row 3 order.
    pub columns: Vec<OutputColumn>,
    /// Number of records (equal to the input data row count).
    pub row_count: usize,
}

impl OutputTable {
    /// Column by header text (first match).
    pub fn column(&self, header: &str) -> Option<&OutputColumn> {
        self.columns
            .iter()
            .find(|c| matches!(&c.header, CellValue::String(s) if s == header))
    }
}
