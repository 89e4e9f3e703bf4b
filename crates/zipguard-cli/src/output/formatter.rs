//! Output formatter trait for CLI results.

use crate::cli::Operation;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use zipguard_core::ExtractionReport;
use zipguard_core::HashOutcome;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the fingerprint of a valid archive
    fn format_hash_result(&self, archive: &Path, outcome: &HashOutcome) -> Result<()>;

    /// Format extraction result
    fn format_extraction_result(&self, target: &Path, report: &ExtractionReport) -> Result<()>;

    /// Format a failed operation
    fn format_error(&self, operation: Operation, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
