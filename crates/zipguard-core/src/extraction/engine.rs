//! Core extraction engine.

use std::collections::HashSet;
use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use tracing::debug;
use tracing::instrument;
use tracing::trace;

use super::stream::SizeLimitedReader;
use crate::Archive;
use crate::ArchiveError;
use crate::Entry;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::SecurityConfig;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;

/// Set of directories known to exist below the target.
///
/// Avoids one `create_dir_all` call per extracted file when many files
/// share a parent.
#[derive(Debug, Default)]
pub(crate) struct DirCache {
    created: HashSet<PathBuf>,
}

impl DirCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates the parent of `path` unless it is already known. Returns
    /// `true` if a directory was created by this call.
    pub(crate) fn ensure_parent_dir(&mut self, path: &Path) -> std::io::Result<bool> {
        let Some(parent) = path.parent() else {
            return Ok(false);
        };
        if self.created.contains(parent) {
            return Ok(false);
        }
        let existed = parent.is_dir();
        fs::create_dir_all(parent)?;
        self.created.insert(parent.to_path_buf());
        Ok(!existed)
    }
}

/// Writes the files of a validated archive into a target directory.
///
/// The archive must have passed validation and, where an expected
/// fingerprint exists, hash verification; the extractor only enforces the
/// properties that can be checked while writing:
///
/// - the target directory is empty or absent
/// - no destination file already exists (exclusive creation)
/// - no entry decompresses to more bytes than it declared
///
/// Files already written are left in place when extraction fails.
///
/// # Examples
///
/// ```no_run
/// use zipguard_core::Archive;
/// use zipguard_core::Extractor;
/// use zipguard_core::NoopProgress;
/// use zipguard_core::SecurityConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SecurityConfig::default();
/// let mut archive = Archive::open("module.zip", &config)?;
/// archive.validate(&config).check()?;
///
/// let report = Extractor::new("/tmp/module", &config)
///     .with_prefix("example.com/mod@v1.0.0")
///     .extract(&mut archive, &mut NoopProgress)?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Extractor<'a> {
    target: PathBuf,
    prefix: Option<String>,
    config: &'a SecurityConfig,
}

impl<'a> Extractor<'a> {
    /// Creates an extractor writing below `target`.
    pub fn new(target: impl Into<PathBuf>, config: &'a SecurityConfig) -> Self {
        Self {
            target: target.into(),
            prefix: None,
            config,
        }
    }

    /// Restricts extraction to names below `prefix`, which is stripped from
    /// destination paths. An empty prefix disables filtering.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    /// Returns the target directory.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Returns the prefix filter, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Fails if the target directory exists and has any entry.
    ///
    /// A target that cannot be listed is not rejected here; creating files
    /// in it fails later instead.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::TargetNotEmpty`.
    pub fn ensure_target_empty(&self) -> Result<()> {
        if let Ok(mut entries) = fs::read_dir(&self.target)
            && entries.next().is_some()
        {
            return Err(ArchiveError::TargetNotEmpty {
                path: self.target.clone(),
            });
        }
        Ok(())
    }

    /// Maps an entry name to its path relative to the target, or `None` if
    /// the entry is outside the prefix.
    fn relative_name<'n>(&self, name: &'n str) -> Option<&'n str> {
        match &self.prefix {
            Some(prefix) => name.strip_prefix(prefix.as_str())?.strip_prefix('/'),
            None => Some(name),
        }
    }

    /// Returns `true` if `entry` is a file this extractor writes.
    fn is_extracted(&self, entry: &Entry) -> bool {
        !entry.name.is_empty() && !entry.is_dir && self.relative_name(&entry.name).is_some()
    }

    /// Extracts every file of `archive` in archive order.
    ///
    /// Directory entries are skipped; directories are created as parents of
    /// the files that need them.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the target is not empty (`TargetNotEmpty`)
    /// - a destination file exists or cannot be written (`Io`)
    /// - an entry is larger than declared (`DeclaredSizeExceeded`)
    /// - a prefix was set and matched no file (`PrefixNotMatched`)
    #[instrument(skip_all, fields(target = %self.target.display(), prefix = ?self.prefix))]
    pub fn extract(
        &self,
        archive: &mut Archive,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionReport> {
        let start = Instant::now();

        self.ensure_target_empty()?;
        fs::create_dir_all(&self.target)?;

        let mut report = ExtractionReport::new();
        let mut dir_cache = DirCache::new();
        let mut buffer = CopyBuffer::new();
        let mut prefix_matched = false;

        let entries = archive.entries().to_vec();
        let total = entries
            .iter()
            .filter(|entry| self.is_extracted(entry))
            .count();
        let mut current = 0;

        for entry in &entries {
            if entry.name.is_empty() || entry.is_dir {
                continue;
            }
            let Some(relative) = self.relative_name(&entry.name) else {
                trace!(name = %entry.name, "outside prefix");
                report.files_skipped += 1;
                continue;
            };
            prefix_matched = true;

            let relative = Path::new(relative);
            current += 1;
            progress.on_entry_start(relative, total, current);

            let dest = self.target.join(relative);
            if dir_cache.ensure_parent_dir(&dest)? {
                report.directories_created += 1;
            }

            let file = self.create_file(&dest)?;
            let mut writer = BufWriter::with_capacity(buffer.size(), file);
            let mut reader =
                SizeLimitedReader::new(archive.entry_reader(entry.index)?, entry.declared_size);

            let copied = copy_with_buffer(&mut reader, &mut writer, &mut buffer, |n| {
                progress.on_bytes_written(n);
            });
            let bytes = match copied {
                Ok(bytes) => bytes,
                Err(_) if reader.exceeded() => {
                    writer.flush()?;
                    return Err(ArchiveError::DeclaredSizeExceeded {
                        path: entry.name.clone(),
                        declared: entry.declared_size,
                    });
                }
                Err(e) => return Err(e.into()),
            };
            writer.flush()?;

            trace!(name = %entry.name, bytes, "extracted");
            report.files_extracted += 1;
            report.bytes_written += bytes;
            progress.on_entry_complete(relative);
        }

        if let Some(prefix) = &self.prefix
            && !prefix_matched
        {
            return Err(ArchiveError::PrefixNotMatched {
                prefix: prefix.clone(),
            });
        }

        report.duration = start.elapsed();
        progress.on_complete();
        debug!(
            files = report.files_extracted,
            bytes = report.bytes_written,
            skipped = report.files_skipped,
            "extraction finished"
        );
        Ok(report)
    }

    fn create_file(&self, path: &Path) -> Result<File> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.config.file_mode);
        }
        #[cfg(not(unix))]
        let _ = self.config.file_mode;

        Ok(options.open(path)?)
    }
}
