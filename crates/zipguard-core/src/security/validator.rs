//! Entry validation orchestrator.
//!
//! This module provides the `ArchiveValidator` type that runs path,
//! collision and size checks over every entry of an archive and collects
//! the outcome in a [`ValidationReport`].

use tracing::debug;
use tracing::trace;

use crate::ArchiveError;
use crate::Entry;
use crate::Result;
use crate::SecurityConfig;
use crate::error::FileError;
use crate::error::FileErrorList;
use crate::error::QuotaResource;
use crate::security::collision::CollisionChecker;
use crate::security::path::PathError;
use crate::security::path::is_clean;
use crate::security::path::validate_entry_path;
use crate::security::quota::QuotaTracker;

/// Outcome of validating every entry of an archive.
///
/// Per-entry failures and the size budget are tracked separately and only
/// combined by [`ValidationReport::check`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Raw names of files that passed validation, in archive order.
    pub valid: Vec<String>,

    /// Entries excluded by policy rather than rejected.
    pub omitted: Vec<FileError>,

    /// Entries that failed path or collision checks, in archive order.
    pub invalid: Vec<FileError>,

    /// First size budget violation, if any.
    pub size_error: Option<QuotaResource>,
}

impl ValidationReport {
    /// Returns the terminal error of this report.
    ///
    /// A size violation takes precedence over invalid entries; the entries
    /// remain available in [`ValidationReport::invalid`].
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::QuotaExceeded` if a size budget was exceeded,
    /// otherwise `ArchiveError::InvalidEntries` if any entry was rejected.
    pub fn check(&self) -> Result<()> {
        if let Some(resource) = &self.size_error {
            return Err(ArchiveError::QuotaExceeded {
                resource: resource.clone(),
            });
        }
        if !self.invalid.is_empty() {
            return Err(ArchiveError::InvalidEntries(FileErrorList(
                self.invalid.clone(),
            )));
        }
        Ok(())
    }

    /// Returns `true` if [`ValidationReport::check`] would succeed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.size_error.is_none() && self.invalid.is_empty()
    }
}

/// Runs every validation over the entries of one archive.
///
/// This type maintains state across entry validations:
/// - the collision registry (folded paths and implied directories)
/// - the running total of declared sizes
///
/// # Lifecycle
///
/// 1. Create with `ArchiveValidator::new(&config)`
/// 2. For each entry, in archive order, call `validate_entry()`
/// 3. Call `finish()` for the report
///
/// # Examples
///
/// ```
/// use zipguard_core::Entry;
/// use zipguard_core::SecurityConfig;
/// use zipguard_core::security::ArchiveValidator;
///
/// let config = SecurityConfig::default();
/// let mut validator = ArchiveValidator::new(&config);
///
/// validator.validate_entry(&Entry::new(0, "a/", 0));
/// validator.validate_entry(&Entry::new(1, "a/b.txt", 2));
/// validator.validate_entry(&Entry::new(2, "A/B.txt", 2));
///
/// let report = validator.finish();
/// assert_eq!(report.valid, vec!["a/b.txt".to_string()]);
/// assert_eq!(report.invalid.len(), 1);
/// assert!(report.check().is_err());
/// ```
pub struct ArchiveValidator<'a> {
    config: &'a SecurityConfig,
    collisions: CollisionChecker,
    quota_tracker: QuotaTracker,
    report: ValidationReport,
}

impl<'a> ArchiveValidator<'a> {
    /// Creates a validator with an empty registry and a zero total.
    #[must_use]
    pub fn new(config: &'a SecurityConfig) -> Self {
        Self {
            config,
            collisions: CollisionChecker::new(),
            quota_tracker: QuotaTracker::new(),
            report: ValidationReport::default(),
        }
    }

    /// Classifies one entry.
    ///
    /// A rejected entry is neither registered for collisions nor counted
    /// against the size budget. Directories that pass are registered but
    /// not listed as valid.
    pub fn validate_entry(&mut self, entry: &Entry) {
        let checked = if entry.valid_utf8 || !is_clean(&entry.path) {
            validate_entry_path(&entry.path, self.config)
        } else {
            Err(PathError::InvalidUtf8)
        };
        if let Err(e) = checked {
            trace!(name = %entry.name, error = %e, "path rejected");
            self.report.invalid.push(FileError::new(&entry.name, e));
            return;
        }

        if let Err(e) = self.collisions.check(&entry.path, entry.is_dir) {
            trace!(name = %entry.name, error = %e, "collision");
            self.report.invalid.push(FileError::new(&entry.name, e));
            return;
        }

        if entry.is_dir {
            return;
        }

        self.quota_tracker
            .record_file(&entry.name, entry.declared_size, self.config);
        self.report.valid.push(entry.name.clone());
    }

    /// Consumes the validator and returns the report.
    #[must_use]
    pub fn finish(mut self) -> ValidationReport {
        self.report.size_error = self.quota_tracker.into_error();
        debug!(
            valid = self.report.valid.len(),
            invalid = self.report.invalid.len(),
            size_error = self.report.size_error.is_some(),
            "validation finished"
        );
        self.report
    }
}

/// Validates `entries` in order and returns the report.
pub fn validate_entries<'e>(
    entries: impl IntoIterator<Item = &'e Entry>,
    config: &SecurityConfig,
) -> ValidationReport {
    let mut validator = ArchiveValidator::new(config);
    for entry in entries {
        validator.validate_entry(entry);
    }
    validator.finish()
}
