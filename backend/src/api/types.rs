//! REST API response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::error_chain;

/// Body returned when a conversion fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Always "error"
    pub status: String,

    /// Top-level error message
    pub error: String,

    /// Full cause chain, outermost first
    pub trace: Vec<String>,
}

impl ErrorResponse {
    /// Response for a message without an underlying error.
    pub fn message(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            job_id: Uuid::new_v4().to_string(),
            status: "error".to_string(),
            trace: vec![error.clone()],
            error,
        }
    }

    /// Response carrying the error's full diagnostic trace.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            status: "error".to_string(),
            error: err.to_string(),
            trace: error_chain(err),
        }
    }
}

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Worksheet read from uploads when the form does not name one
    pub default_sheet: String,
}
