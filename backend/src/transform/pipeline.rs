//! High-level pipeline API: workbook bytes in, workbook bytes out.
//!
//! Combines layout parsing, column resolution, weight derivation and
//! serialization. Each call is self-contained.
//!
//! # Example
//!
//! ```rust,ignore
//! use ttd_excel::transform::pipeline::{process_file, TransformOptions};
//!
//! let result = process_file("dispatch.xlsx", &TransformOptions::default())?;
//! std::fs::write(&result.file_name, &result.bytes)?;
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::api::logs::{log_info, log_success, log_warning};
use crate::error::PipelineError;
use crate::models::OutputTable;
use crate::parser::parse_layout;
use crate::writer::write_workbook;

use super::executor::execute;
use super::resolver::{default_literal_rules, LiteralRule};
use super::weight::WeightRules;

/// Worksheet read from uploaded workbooks.
pub const DEFAULT_SHEET: &str = "Sheet5";

/// File name offered for the produced workbook.
pub const DEFAULT_OUTPUT_FILE: &str = "ttd_output.xlsx";

/// Options for one transformation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Worksheet holding the three header rows and the data.
    pub sheet_name: String,

    /// File name for the produced workbook.
    pub output_file_name: String,

    /// Destination header rules, in priority order.
    pub literal_rules: Vec<LiteralRule>,

    /// Category weight table.
    pub weight_rules: WeightRules,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET.to_string(),
            output_file_name: DEFAULT_OUTPUT_FILE.to_string(),
            literal_rules: default_literal_rules(),
            weight_rules: WeightRules::default(),
        }
    }
}

impl TransformOptions {
    /// Same options reading from another worksheet.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet_name = sheet.into();
        self
    }
}

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Serialized output workbook.
    pub bytes: Vec<u8>,

    /// Suggested file name for `bytes`.
    pub file_name: String,

    /// The table that was serialized.
    pub table: OutputTable,
}

/// Transform workbook bytes into the output workbook.
///
/// Any error aborts the run; no bytes are produced on failure.
pub fn process_bytes(bytes: &[u8], options: &TransformOptions) -> Result<ProcessResult, PipelineError> {
    log_info(format!("📖 Reading worksheet '{}' ({} bytes)...", options.sheet_name, bytes.len()));
    let layout = parse_layout(bytes, &options.sheet_name)?;
    log_success(format!(
        "{} columns, {} data rows",
        layout.column_count,
        layout.data.len()
    ));
    if layout.data.is_empty() {
        log_warning("Worksheet has no data rows below the header rows");
    }

    log_info("⚙️  Transforming rows...");
    let table = execute(&layout, &options.literal_rules, &options.weight_rules)?;

    let output = write_workbook(&layout.row3, &table)?;
    log_success(format!("Wrote {} ({} bytes)", options.output_file_name, output.len()));

    Ok(ProcessResult {
        bytes: output,
        file_name: options.output_file_name.clone(),
        table,
    })
}

/// Transform a workbook on disk.
pub fn process_file<P: AsRef<Path>>(path: P, options: &TransformOptions) -> Result<ProcessResult, PipelineError> {
    let bytes = std::fs::read(path.as_ref())?;
    process_bytes(&bytes, options)
}
