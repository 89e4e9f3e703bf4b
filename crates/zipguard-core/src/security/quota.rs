//! Size budget tracking.

use crate::ArchiveError;
use crate::Result;
use crate::SecurityConfig;
use crate::error::QuotaResource;

/// Checks the size of the zip container before any entry is read.
///
/// # Errors
///
/// Returns `ArchiveError::QuotaExceeded` with
/// `QuotaResource::ArchiveSize` if the archive is over budget.
pub fn check_archive_size(size: u64, config: &SecurityConfig) -> Result<()> {
    if size > config.max_archive_size {
        return Err(ArchiveError::QuotaExceeded {
            resource: QuotaResource::ArchiveSize {
                size,
                max: config.max_archive_size,
            },
        });
    }
    Ok(())
}

/// Accumulates declared uncompressed sizes of valid files.
///
/// Unlike per-entry errors, a budget violation does not reject the entry
/// that caused it: only the first violation is kept and classification of
/// the remaining entries continues.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    total_size: u64,
    files_recorded: usize,
    error: Option<QuotaResource>,
}

impl QuotaTracker {
    /// Creates a new quota tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the declared size of a file entry.
    ///
    /// The size is added to the running total only if it fits both the
    /// single-file and the remaining total budget; otherwise the first
    /// violation is remembered.
    pub fn record_file(&mut self, path: &str, declared_size: u64, config: &SecurityConfig) {
        self.files_recorded += 1;

        let remaining = config.max_total_size.saturating_sub(self.total_size);
        if declared_size <= config.max_file_size && declared_size <= remaining {
            self.total_size += declared_size;
            return;
        }

        if self.error.is_none() {
            let resource = if declared_size > config.max_file_size {
                QuotaResource::FileSize {
                    path: path.to_string(),
                    size: declared_size,
                    max: config.max_file_size,
                }
            } else {
                QuotaResource::TotalSize {
                    max: config.max_total_size,
                }
            };
            self.error = Some(resource);
        }
    }

    /// Returns the number of files recorded.
    #[must_use]
    pub fn files_recorded(&self) -> usize {
        self.files_recorded
    }

    /// Returns the sum of declared sizes that fit the budget.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Returns the first budget violation, if any.
    #[must_use]
    pub fn error(&self) -> Option<&QuotaResource> {
        self.error.as_ref()
    }

    /// Consumes the tracker, returning the first budget violation.
    #[must_use]
    pub fn into_error(self) -> Option<QuotaResource> {
        self.error
    }
}
