//! Error types for archive validation, hashing and extraction.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::security::collision::CollisionError;
use crate::security::path::PathError;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Represents a specific size budget that was exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaResource {
    /// The zip container itself is larger than the budget.
    ArchiveSize {
        /// Size of the archive file in bytes.
        size: u64,
        /// Maximum allowed archive size in bytes.
        max: u64,
    },
    /// Sum of declared uncompressed sizes exceeds the budget.
    TotalSize {
        /// Maximum allowed total uncompressed size in bytes.
        max: u64,
    },
    /// A single entry declares more bytes than allowed.
    FileSize {
        /// Raw entry name.
        path: String,
        /// Declared uncompressed size in bytes.
        size: u64,
        /// Maximum allowed single file size in bytes.
        max: u64,
    },
}

impl fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArchiveSize { size, max } => {
                write!(
                    f,
                    "zip file is too large ({size} bytes; limit is {max} bytes)"
                )
            }
            Self::TotalSize { max } => {
                write!(
                    f,
                    "total uncompressed size of archive contents too large (max size is {max} bytes)"
                )
            }
            Self::FileSize { path, size, max } => {
                write!(
                    f,
                    "uncompressed size of file {path} too large ({size} bytes; max size is {max} bytes)"
                )
            }
        }
    }
}

/// Why a single entry was rejected by validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryErrorKind {
    /// The entry name is not a clean, portable relative path.
    #[error(transparent)]
    Path(#[from] PathError),

    /// The entry conflicts with another entry of the archive.
    #[error(transparent)]
    Collision(#[from] CollisionError),
}

/// A rejected archive entry together with the reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}: {kind}")]
pub struct FileError {
    /// Raw entry name as stored in the archive.
    pub path: String,
    /// Reason the entry was rejected.
    #[source]
    pub kind: EntryErrorKind,
}

impl FileError {
    /// Creates a new entry error.
    pub fn new(path: impl Into<String>, kind: impl Into<EntryErrorKind>) -> Self {
        Self {
            path: path.into(),
            kind: kind.into(),
        }
    }
}

/// Every rejected entry of one validation pass.
///
/// Displays one entry error per line, in archive order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileErrorList(pub Vec<FileError>);

impl FileErrorList {
    /// Returns the rejected entries.
    #[must_use]
    pub fn entries(&self) -> &[FileError] {
        &self.0
    }

    /// Returns the number of rejected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no entry was rejected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FileErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for err in &self.0 {
            write!(f, "{sep}{err}")?;
            sep = "\n";
        }
        Ok(())
    }
}

impl std::error::Error for FileErrorList {}

/// Errors that can occur while validating, hashing or extracting an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The zip container could not be decoded.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// A size budget was exceeded.
    #[error("{resource}")]
    QuotaExceeded {
        /// Description of the exceeded budget.
        resource: QuotaResource,
    },

    /// One or more entries failed path or collision checks.
    #[error("{0}")]
    InvalidEntries(FileErrorList),

    /// The computed fingerprint differs from the expected one.
    #[error("got hash {actual}, expected {expected}")]
    HashMismatch {
        /// Fingerprint computed from the archive.
        actual: String,
        /// Fingerprint supplied by the caller.
        expected: String,
    },

    /// The extraction target exists and already has content.
    #[error("target directory {} exists and is not empty", path.display())]
    TargetNotEmpty {
        /// The target directory.
        path: PathBuf,
    },

    /// An entry decompressed to more bytes than its declared size.
    #[error("uncompressed size of file {path} is larger than declared size ({declared} bytes)")]
    DeclaredSizeExceeded {
        /// Raw entry name.
        path: String,
        /// Declared uncompressed size in bytes.
        declared: u64,
    },

    /// A non-empty extraction prefix matched no file entry.
    #[error("no file matched prefix {prefix:?}")]
    PrefixNotMatched {
        /// The requested prefix.
        prefix: String,
    },

    /// The entry name cannot be represented in a fingerprint line.
    #[error("file name {path:?} contains a newline and cannot be hashed")]
    UnhashableName {
        /// Raw entry name.
        path: String,
    },
}

impl ArchiveError {
    /// Returns `true` if this error means the archive breaks a structural or
    /// size rule, as opposed to an I/O or decoding failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipguard_core::ArchiveError;
    /// use zipguard_core::QuotaResource;
    ///
    /// let err = ArchiveError::QuotaExceeded {
    ///     resource: QuotaResource::TotalSize { max: 10 },
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ArchiveError::InvalidArchive("bad header".into());
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::QuotaExceeded { .. }
                | Self::InvalidEntries(_)
                | Self::DeclaredSizeExceeded { .. }
                | Self::UnhashableName { .. }
        )
    }

    /// Returns `true` if the error aggregates per-entry validation failures.
    #[must_use]
    pub const fn is_entry_error(&self) -> bool {
        matches!(self, Self::InvalidEntries(_))
    }

    /// Returns the size budget that was exceeded, if applicable.
    #[must_use]
    pub const fn quota_resource(&self) -> Option<&QuotaResource> {
        match self {
            Self::QuotaExceeded { resource } => Some(resource),
            _ => None,
        }
    }

    /// Returns the rejected entries, if applicable.
    #[must_use]
    pub fn invalid_entries(&self) -> Option<&[FileError]> {
        match self {
            Self::InvalidEntries(list) => Some(list.entries()),
            _ => None,
        }
    }
}
