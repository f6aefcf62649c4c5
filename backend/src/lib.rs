//! # TTD Excel - dispatch sheet reshaping
//!
//! Reads a worksheet laid out as three header rows (source names, mapping
//! directives, destination names) followed by data, and writes a workbook in
//! the destination layout with a derived physical weight column.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Workbook   │────▶│   Parser    │────▶│  Transform  │────▶│   Writer    │
//! │ (xlsx/xls)  │     │ (3 headers) │     │ (resolver)  │     │  (Sheet1)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ttd_excel::{process_file, TransformOptions};
//!
//! let result = process_file("dispatch.xlsx", &TransformOptions::default()).unwrap();
//! std::fs::write(&result.file_name, &result.bytes).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Cell values, sheet layout, output table
//! - [`parser`] - Worksheet reading via calamine
//! - [`transform`] - Weight rules, column resolution, pipeline
//! - [`writer`] - Output workbook via rust_xlsxwriter
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Reading
pub mod parser;

// Transformation
pub mod transform;

// Writing
pub mod writer;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    error_chain, FieldError, PipelineError, ServerError, WorkbookError, WriteError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{CellValue, OutputColumn, OutputTable, SheetLayout};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{parse_layout, parse_layout_file, read_sheet_grid, sheet_names};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    default_literal_rules, describe_rules, execute, ColumnResolver, ColumnSource, ComputedField,
    LiteralRule, RuleAction, WeightRule, WeightRules,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    process_bytes, process_file, ProcessResult, TransformOptions, DEFAULT_OUTPUT_FILE,
    DEFAULT_SHEET,
};

// =============================================================================
// Re-exports - Writer
// =============================================================================

pub use writer::{write_workbook, OUTPUT_SHEET, XLSX_MIME};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
