//! Bounded reader enforcing declared entry sizes.

use std::io;
use std::io::Read;

/// Reader that refuses to deliver more bytes than an entry declared.
///
/// Up to `declared` bytes are passed through. Once they are delivered, the
/// next read probes the inner reader for a single byte: end of stream ends
/// the copy normally, anything else fails this read and every later one.
/// The extra byte is never handed to the caller. Memory and disk use are thus
/// bounded by the declared size whatever the decompressor produces.
///
/// # Examples
///
/// ```
/// use std::io::Read;
/// use zipguard_core::extraction::SizeLimitedReader;
///
/// let mut exact = SizeLimitedReader::new(&b"abc"[..], 3);
/// let mut out = Vec::new();
/// assert!(exact.read_to_end(&mut out).is_ok());
///
/// let mut over = SizeLimitedReader::new(&b"abcd"[..], 3);
/// assert!(over.read_to_end(&mut Vec::new()).is_err());
/// assert!(over.exceeded());
/// ```
#[derive(Debug)]
pub struct SizeLimitedReader<R> {
    inner: R,
    declared: u64,
    bytes_read: u64,
    exceeded: bool,
}

impl<R> SizeLimitedReader<R> {
    /// Wraps `inner`, allowing at most `declared` bytes through.
    pub fn new(inner: R, declared: u64) -> Self {
        Self {
            inner,
            declared,
            bytes_read: 0,
            exceeded: false,
        }
    }

    /// Returns `true` once the inner reader produced more than the declared
    /// number of bytes.
    #[must_use]
    pub fn exceeded(&self) -> bool {
        self.exceeded
    }

    /// Returns the number of bytes delivered to the caller.
    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Returns the declared size.
    #[must_use]
    pub fn declared(&self) -> u64 {
        self.declared
    }
}

fn exceeded_error(declared: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("stream is larger than declared size ({declared} bytes)"),
    )
}

impl<R: Read> Read for SizeLimitedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.exceeded {
            return Err(exceeded_error(self.declared));
        }
        if buf.is_empty() {
            return Ok(0);
        }

        if self.bytes_read < self.declared {
            let remaining = self.declared - self.bytes_read;
            let max = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
            let n = self.inner.read(&mut buf[..max])?;
            self.bytes_read += n as u64;
            return Ok(n);
        }

        // At the limit: one more byte means the declared size was a lie.
        let n = self.inner.read(&mut buf[..1])?;
        if n > 0 {
            self.exceeded = true;
            return Err(exceeded_error(self.declared));
        }
        Ok(0)
    }
}
