//! File copy with a reusable buffer.
//!
//! Extraction copies every entry through the same [`CopyBuffer`] instead of
//! letting `std::io::copy` allocate per call, and reports progress after
//! each chunk.

use std::io;
use std::io::Read;
use std::io::Write;

/// Buffer size for I/O operations (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Heap-allocated buffer reused across the entries of one extraction.
///
/// # Examples
///
/// ```
/// use zipguard_core::copy::CopyBuffer;
/// use zipguard_core::copy::copy_with_buffer;
///
/// # fn main() -> std::io::Result<()> {
/// let mut buffer = CopyBuffer::new();
/// let mut output = Vec::new();
///
/// let copied = copy_with_buffer(&mut &b"hello"[..], &mut output, &mut buffer, |_| {})?;
/// assert_eq!(copied, 5);
/// assert_eq!(output, b"hello");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zero-initialized copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies `reader` into `writer` through `buffer`, calling `on_chunk` with
/// the size of every chunk written.
///
/// Interrupted reads are retried. The error of the reader is returned as
/// is so that callers can tell a failing source from a failing sink by
/// inspecting their own reader.
///
/// # Errors
///
/// Returns the first read or write error.
pub fn copy_with_buffer<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
    mut on_chunk: F,
) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(u64),
{
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;

        let chunk = bytes_read as u64;
        total = total.saturating_add(chunk);
        on_chunk(chunk);
    }

    Ok(total)
}
