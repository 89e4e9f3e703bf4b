//! Hash command implementation.

use crate::cli::Operation;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use std::path::Path;
use zipguard_core::SecurityConfig;
use zipguard_core::hash_archive;

pub fn execute(
    archive: &Path,
    config: &SecurityConfig,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let outcome = add_archive_context(hash_archive(archive, config), Operation::Hash, archive)?;
    formatter.format_hash_result(archive, &outcome)
}
