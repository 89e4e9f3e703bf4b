//! Decoded zip archive and its entries.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::instrument;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::ArchiveError;
use crate::ContentHasher;
use crate::Fingerprint;
use crate::Result;
use crate::SecurityConfig;
use crate::security::ValidationReport;
use crate::security::check_archive_size;
use crate::security::validate_entries;

/// One item of an archive, as recorded in its central directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Position of the entry in the archive.
    pub index: usize,

    /// Raw entry name.
    pub name: String,

    /// Name without the trailing `/` of a directory marker.
    pub path: String,

    /// Whether the raw name ended with `/`.
    pub is_dir: bool,

    /// Uncompressed size recorded in the archive metadata.
    pub declared_size: u64,

    /// Whether the stored name bytes were valid UTF-8. When `false`, `name`
    /// holds a lossy decoding and the entry fails validation.
    pub valid_utf8: bool,
}

impl Entry {
    /// Creates an entry from its raw name.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipguard_core::Entry;
    ///
    /// let dir = Entry::new(0, "docs/", 0);
    /// assert!(dir.is_dir);
    /// assert_eq!(dir.path, "docs");
    ///
    /// let file = Entry::new(1, "docs/readme.md", 42);
    /// assert!(!file.is_dir);
    /// assert_eq!(file.path, "docs/readme.md");
    /// ```
    pub fn new(index: usize, name: impl Into<String>, declared_size: u64) -> Self {
        let name = name.into();
        let (path, is_dir) = match name.strip_suffix('/') {
            Some(stripped) => (stripped.to_string(), true),
            None => (name.clone(), false),
        };
        Self {
            index,
            name,
            path,
            is_dir,
            declared_size,
            valid_utf8: true,
        }
    }

    /// Creates an entry from the name bytes stored in the archive.
    ///
    /// The bytes are taken as UTF-8 whatever the encoding flag of the entry
    /// says.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipguard_core::Entry;
    ///
    /// let entry = Entry::from_raw_name(0, "日本.txt".as_bytes(), 2);
    /// assert_eq!(entry.name, "日本.txt");
    /// assert!(entry.valid_utf8);
    ///
    /// let entry = Entry::from_raw_name(1, b"bad\xff", 0);
    /// assert!(!entry.valid_utf8);
    /// ```
    pub fn from_raw_name(index: usize, raw: &[u8], declared_size: u64) -> Self {
        match std::str::from_utf8(raw) {
            Ok(name) => Self::new(index, name, declared_size),
            Err(_) => Self {
                valid_utf8: false,
                ..Self::new(index, String::from_utf8_lossy(raw), declared_size)
            },
        }
    }
}

/// A zip archive opened from disk.
///
/// Opening checks the size of the container, decodes the central directory
/// once and keeps the entry list; entry contents are decompressed on demand.
///
/// # Examples
///
/// ```no_run
/// use zipguard_core::Archive;
/// use zipguard_core::SecurityConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SecurityConfig::default();
/// let mut archive = Archive::open("module.zip", &config)?;
///
/// let report = archive.validate(&config);
/// println!("{} valid files", report.valid.len());
/// println!("{}", archive.fingerprint()?);
/// # Ok(())
/// # }
/// ```
pub struct Archive {
    path: PathBuf,
    size: u64,
    zip: ZipArchive<File>,
    entries: Vec<Entry>,
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl Archive {
    /// Opens and decodes the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the file cannot be opened (`Io`)
    /// - the file is larger than `max_archive_size` (`QuotaExceeded`)
    /// - the zip structure cannot be decoded (`InvalidArchive`)
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P, config: &SecurityConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let size = file.metadata()?.len();

        check_archive_size(size, config)?;

        let mut zip = ZipArchive::new(file).map_err(|e| {
            ArchiveError::InvalidArchive(format!("failed to open ZIP archive: {e}"))
        })?;

        let mut entries = Vec::with_capacity(zip.len());
        for index in 0..zip.len() {
            let file = zip.by_index_raw(index).map_err(entry_error)?;
            entries.push(Entry::from_raw_name(index, file.name_raw(), file.size()));
        }

        debug!(size, entries = entries.len(), "archive decoded");

        Ok(Self {
            path,
            size,
            zip,
            entries,
        })
    }

    /// Returns the path the archive was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the entries in archive order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Runs path, collision and size checks over every entry.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn validate(&self, config: &SecurityConfig) -> ValidationReport {
        validate_entries(&self.entries, config)
    }

    /// Computes the content fingerprint.
    ///
    /// Every entry whose name does not end with `/` is hashed, whether or
    /// not it passes validation.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry cannot be decompressed or if a file name
    /// contains a newline.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn fingerprint(&mut self) -> Result<Fingerprint> {
        let mut hasher = ContentHasher::new();
        for entry in &self.entries {
            if entry.is_dir {
                continue;
            }
            let reader = self.zip.by_index(entry.index).map_err(entry_error)?;
            hasher.add_file(&entry.name, reader)?;
        }
        debug!(files = hasher.len(), "hashed archive contents");
        Ok(hasher.finish())
    }

    /// Opens the decompressed stream of the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArchive` if the entry cannot be decoded.
    pub fn entry_reader(&mut self, index: usize) -> Result<impl Read + '_> {
        self.zip.by_index(index).map_err(entry_error)
    }
}

fn entry_error(e: ZipError) -> ArchiveError {
    match e {
        ZipError::Io(io) => ArchiveError::Io(io),
        other => ArchiveError::InvalidArchive(format!("failed to read ZIP entry: {other}")),
    }
}
