//! Extract command implementation.

use crate::cli::Operation;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use std::path::Path;
use zipguard_core::NoopProgress;
use zipguard_core::ProgressCallback;
use zipguard_core::SecurityConfig;
use zipguard_core::unzip_archive;

/// Arguments of one verified extraction.
pub struct ExtractRequest<'a> {
    pub archive: &'a Path,
    pub expected_hash: &'a str,
    pub target: &'a Path,
    pub prefix: Option<&'a str>,
}

pub fn execute(
    request: &ExtractRequest<'_>,
    config: &SecurityConfig,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    // Use progress bar if TTY is detected (not quiet, not JSON, is terminal)
    let mut cli_progress;
    let mut noop = NoopProgress;
    let progress: &mut dyn ProgressCallback = if show_progress && CliProgress::should_show() {
        cli_progress = CliProgress::new("Extracting");
        &mut cli_progress
    } else {
        &mut noop
    };

    let report = add_archive_context(
        unzip_archive(
            request.archive,
            request.expected_hash,
            request.target,
            request.prefix,
            config,
            progress,
        ),
        Operation::Unzip,
        request.archive,
    )?;

    formatter.format_extraction_result(request.target, &report)
}
