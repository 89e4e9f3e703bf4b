//! High-level public API for fingerprinting and extracting archives.

use std::path::Path;

use tracing::info;
use tracing::instrument;

use crate::Archive;
use crate::ArchiveError;
use crate::ExtractionReport;
use crate::Extractor;
use crate::Fingerprint;
use crate::ProgressCallback;
use crate::Result;
use crate::SecurityConfig;
use crate::security::ValidationReport;

/// Fingerprint of an archive together with its validation report.
#[derive(Debug, Clone)]
pub struct HashOutcome {
    /// Content fingerprint.
    pub fingerprint: Fingerprint,

    /// Classification of every entry.
    pub report: ValidationReport,
}

/// Computes the fingerprint of a valid archive.
///
/// The archive is opened (container size check), hashed and validated; the
/// fingerprint is returned only if validation succeeds.
///
/// # Errors
///
/// Returns an error if:
/// - the archive cannot be read or decoded
/// - the container or its declared content is over budget
/// - any entry has an invalid path or collides with another entry
///
/// # Examples
///
/// ```no_run
/// use zipguard_core::SecurityConfig;
/// use zipguard_core::hash_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = hash_archive("module.zip", &SecurityConfig::default())?;
/// println!("{}", outcome.fingerprint);
/// # Ok(())
/// # }
/// ```
#[instrument(skip_all, fields(archive = %archive_path.as_ref().display()))]
pub fn hash_archive<P: AsRef<Path>>(archive_path: P, config: &SecurityConfig) -> Result<HashOutcome> {
    let mut archive = Archive::open(archive_path, config)?;
    let fingerprint = archive.fingerprint()?;
    let report = archive.validate(config);
    report.check()?;

    info!(%fingerprint, files = report.valid.len(), "archive is valid");
    Ok(HashOutcome {
        fingerprint,
        report,
    })
}

/// Verifies an archive against an expected fingerprint and extracts it.
///
/// Steps, each terminal on failure:
/// 1. open the archive (container size check, decoding)
/// 2. compare the fingerprint with `expected_hash`
/// 3. require `target_dir` to be empty or absent
/// 4. validate every entry
/// 5. extract files, stripping `prefix/` when a prefix is given
///
/// # Errors
///
/// Returns `ArchiveError::HashMismatch` if the fingerprint differs, or any
/// error of the individual steps.
///
/// # Examples
///
/// ```no_run
/// use zipguard_core::NoopProgress;
/// use zipguard_core::SecurityConfig;
/// use zipguard_core::unzip_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = unzip_archive(
///     "module.zip",
///     "h1:47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=",
///     "/tmp/module",
///     Some("example.com/mod@v1.0.0"),
///     &SecurityConfig::default(),
///     &mut NoopProgress,
/// )?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
#[instrument(
    skip_all,
    fields(
        archive = %archive_path.as_ref().display(),
        target = %target_dir.as_ref().display(),
        prefix = ?prefix,
    )
)]
pub fn unzip_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    expected_hash: &str,
    target_dir: Q,
    prefix: Option<&str>,
    config: &SecurityConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let mut archive = Archive::open(archive_path, config)?;

    let fingerprint = archive.fingerprint()?;
    if !fingerprint.matches(expected_hash) {
        return Err(ArchiveError::HashMismatch {
            actual: fingerprint.to_string(),
            expected: expected_hash.to_string(),
        });
    }

    let extractor =
        Extractor::new(target_dir.as_ref(), config).with_prefix(prefix.unwrap_or_default());
    extractor.ensure_target_empty()?;

    archive.validate(config).check()?;

    let report = extractor.extract(&mut archive, progress)?;
    info!(
        files = report.files_extracted,
        bytes = report.bytes_written,
        "archive extracted"
    );
    Ok(report)
}
