//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use crate::cli::Operation;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use zipguard_core::ExtractionReport;
use zipguard_core::HashOutcome;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    const fn operation_name(operation: Operation) -> &'static str {
        match operation {
            Operation::Hash => "hash",
            Operation::Unzip => "extract",
        }
    }
}

#[derive(Serialize)]
struct HashData {
    archive: String,
    fingerprint: String,
    files: Vec<String>,
}

#[derive(Serialize)]
struct ExtractionData {
    target: String,
    files_extracted: usize,
    directories_created: usize,
    files_skipped: usize,
    bytes_written: u64,
    duration_ms: u128,
}

impl OutputFormatter for JsonFormatter {
    fn format_hash_result(&self, archive: &Path, outcome: &HashOutcome) -> Result<()> {
        let data = HashData {
            archive: archive.display().to_string(),
            fingerprint: outcome.fingerprint.to_string(),
            files: outcome.report.valid.clone(),
        };

        let output = JsonOutput::success(Self::operation_name(Operation::Hash), data);
        Self::output(&output)
    }

    fn format_extraction_result(&self, target: &Path, report: &ExtractionReport) -> Result<()> {
        let data = ExtractionData {
            target: target.display().to_string(),
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            files_skipped: report.files_skipped,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        };

        let output = JsonOutput::success(Self::operation_name(Operation::Unzip), data);
        Self::output(&output)
    }

    fn format_error(&self, operation: Operation, error: &anyhow::Error) {
        let output = JsonOutput::error(Self::operation_name(operation), format!("{error:?}"));
        let _ = Self::output(&output);
    }
}
