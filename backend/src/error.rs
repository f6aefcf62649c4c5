//! Error types for the TTD sheet transformation pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`WorkbookError`] - Structural errors while opening/reading the input workbook
//! - [`FieldError`] - Missing or malformed fields needed by the weight computation
//! - [`WriteError`] - Output workbook serialization errors
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP surface errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Workbook (structural) Errors
// =============================================================================

/// Errors while reading the input workbook.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes are not a readable spreadsheet container.
    #[error("Cannot open workbook: {0}")]
    Open(#[source] calamine::Error),

    /// The requested worksheet does not exist.
    #[error("Worksheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    /// The worksheet exists but its cells could not be decoded.
    #[error("Cannot read worksheet '{sheet}': {source}")]
    SheetRead {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
}

// =============================================================================
// Field Errors
// =============================================================================

/// Errors while computing derived fields from data records.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A column required by the weight computation is absent from row 1.
    #[error("Missing source column: {0}")]
    MissingColumn(String),

    /// Quantity holds a value that cannot be read as a number.
    #[error("Quantity at sheet row {row} is not numeric: '{value}'")]
    NonNumericQuantity { row: usize, value: String },
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors while serializing the output workbook.
#[derive(Debug, Error)]
pub enum WriteError {
    /// rust_xlsxwriter failure.
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::process_bytes`].
/// Every variant aborts the run; no partial output is produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Structural error in the input workbook.
    #[error("Workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    /// Field error during derived-column computation.
    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    /// Output serialization error.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// IO error while reading input or writing output files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Walk an error and its `source()` chain, outermost first.
///
/// This is the diagnostic trace shown next to a failed conversion.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut current = err.source();
    while let Some(cause) = current {
        chain.push(cause.to_string());
        current = cause.source();
    }
    chain
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for workbook reading.
pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// Result type for field computations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Result type for output serialization.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // FieldError -> PipelineError
        let field_err = FieldError::MissingColumn("Quantity".into());
        let pipeline_err: PipelineError = field_err.into();
        assert!(pipeline_err.to_string().contains("Quantity"));

        // WorkbookError -> PipelineError
        let wb_err = WorkbookError::SheetNotFound {
            sheet: "Sheet5".into(),
            available: vec!["Sheet1".into(), "Data".into()],
        };
        let pipeline_err: PipelineError = wb_err.into();
        let msg = pipeline_err.to_string();
        assert!(msg.contains("Sheet5"));
        assert!(msg.contains("Sheet1, Data"));
    }

    #[test]
    fn test_error_chain_walks_sources() {
        let err = PipelineError::from(FieldError::NonNumericQuantity {
            row: 7,
            value: "two".into(),
        });
        let chain = error_chain(&err);
        assert_eq!(chain.len(), 2);
        assert!(chain[0].starts_with("Field error"));
        assert!(chain[1].contains("sheet row 7"));
        assert!(chain[1].contains("'two'"));
    }
}
