//! Content fingerprint of an archive.
//!
//! The fingerprint covers the (name, content) pairs of every file and
//! nothing else: entry order, compression method, timestamps and other
//! container metadata do not affect it.

use std::fmt;
use std::io;
use std::io::Read;

use base64::Engine as _;
use base64::engine::general_purpose;
use sha2::Digest;
use sha2::Sha256;

use crate::ArchiveError;
use crate::Result;

/// Version prefix of the fingerprint text format.
pub const FINGERPRINT_PREFIX: &str = "h1:";

/// Deterministic content hash of an archive, `h1:<base64>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Returns the textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `expected` names this fingerprint exactly.
    #[must_use]
    pub fn matches(&self, expected: &str) -> bool {
        self.0 == expected
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Fingerprint {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Fingerprint {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Accumulates per-file digests and produces a [`Fingerprint`].
///
/// # Examples
///
/// ```
/// use zipguard_core::ContentHasher;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut first = ContentHasher::new();
/// first.add_file("a.txt", &b"one"[..])?;
/// first.add_file("b.txt", &b"two"[..])?;
///
/// let mut second = ContentHasher::new();
/// second.add_file("b.txt", &b"two"[..])?;
/// second.add_file("a.txt", &b"one"[..])?;
///
/// assert_eq!(first.finish(), second.finish());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ContentHasher {
    lines: Vec<(String, String)>,
}

impl ContentHasher {
    /// Creates an empty hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Streams `reader` through SHA-256 and records the digest line for
    /// `name`.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::UnhashableName` if `name` contains a newline,
    /// or `ArchiveError::Io` if reading fails.
    pub fn add_file<R: Read>(&mut self, name: &str, mut reader: R) -> Result<()> {
        if name.contains('\n') {
            return Err(ArchiveError::UnhashableName {
                path: name.to_string(),
            });
        }

        let mut hasher = Sha256::new();
        io::copy(&mut reader, &mut hasher)?;
        let digest = hex::encode(hasher.finalize());

        self.lines
            .push((name.to_string(), format!("{digest}  {name}\n")));
        Ok(())
    }

    /// Returns the number of files recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if no file has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sorts the digest lines by name and hashes their concatenation.
    #[must_use]
    pub fn finish(mut self) -> Fingerprint {
        self.lines.sort_unstable();

        let mut summary = Sha256::new();
        for (_, line) in &self.lines {
            summary.update(line.as_bytes());
        }

        let encoded = general_purpose::STANDARD.encode(summary.finalize());
        Fingerprint(format!("{FINGERPRINT_PREFIX}{encoded}"))
    }
}
