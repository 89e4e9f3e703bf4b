//! Error conversion utilities for CLI.
//!
//! Converts zipguard-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use crate::cli::Operation;
use anyhow::anyhow;
use std::path::Path;
use zipguard_core::ArchiveError;
use zipguard_core::QuotaResource;

/// Converts `ArchiveError` to user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, op: Operation, archive: &Path) -> anyhow::Error {
    let archive = archive.display();
    match err {
        ArchiveError::QuotaExceeded { resource } => {
            let hint = match resource {
                QuotaResource::FileSize { .. } => "Use --max-file-size to raise the per-file limit",
                QuotaResource::ArchiveSize { .. } | QuotaResource::TotalSize { .. } => {
                    "Use --max-size to raise the limit"
                }
            };
            anyhow!("{op} {archive}: {resource}\nHINT: {hint} if the archive is trusted.")
        }
        ArchiveError::InvalidEntries(list) => {
            anyhow!(
                "{op} {archive}: {list}\n\
                 HINT: Entry names must be clean, portable and unique ignoring case."
            )
        }
        ArchiveError::HashMismatch { .. } => {
            anyhow!(
                "{op} {archive}: {err}\n\
                 HINT: The archive content changed or the expected hash is wrong."
            )
        }
        ArchiveError::TargetNotEmpty { .. } => {
            anyhow!(
                "{op} {archive}: {err}\n\
                 HINT: Remove the directory or choose a new one."
            )
        }
        ArchiveError::DeclaredSizeExceeded { .. } => {
            anyhow!(
                "Security violation: {op} {archive}: {err}\n\
                 HINT: This archive may be malicious. The partially written file was left in place."
            )
        }
        ArchiveError::PrefixNotMatched { ref prefix } => {
            anyhow!(
                "{op} {archive}: {err}\n\
                 HINT: Files must be stored under '{prefix}/'. Run without a prefix to extract everything."
            )
        }
        ArchiveError::InvalidArchive(reason) => {
            anyhow!(
                "{op} {archive}: invalid archive: {reason}\n\
                 HINT: The archive may be corrupted or malformed."
            )
        }
        ArchiveError::Io(io_err) => anyhow!("{op} {archive}: I/O error: {io_err}"),
        ArchiveError::UnhashableName { .. } => anyhow!("{op} {archive}: {err}"),
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ArchiveError>,
    op: Operation,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, op, archive))
}
