//! Zip fixtures built at test time.

#![allow(dead_code, clippy::unwrap_used)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

const LOCAL_HEADER: [u8; 4] = *b"PK\x03\x04";
const CENTRAL_HEADER: [u8; 4] = *b"PK\x01\x02";

/// Builder for in-memory zip archives.
///
/// ```ignore
/// let data = ZipBuilder::new()
///     .directory("a/")
///     .file("a/b.txt", b"hi")
///     .build();
/// ```
pub struct ZipBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored (uncompressed) file.
    pub fn file(self, name: &str, data: &[u8]) -> Self {
        self.file_with(name, data, CompressionMethod::Stored)
    }

    /// Adds a deflate-compressed file.
    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        self.file_with(name, data, CompressionMethod::Deflated)
    }

    fn file_with(mut self, name: &str, data: &[u8], method: CompressionMethod) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .unix_permissions(0o644);
        self.zip.start_file(name, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory marker; a trailing `/` is added if missing.
    pub fn directory(mut self, name: &str) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(name, options).unwrap();
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }

    /// Builds the archive and writes it to `dir/file_name`.
    pub fn write_to(self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

/// Header fields of one record kind, as byte offsets from its signature.
struct RecordLayout {
    signature: [u8; 4],
    flags_at: usize,
    size_at: usize,
    name_len_at: usize,
    name_at: usize,
}

static RECORDS: [RecordLayout; 2] = [
    RecordLayout {
        signature: LOCAL_HEADER,
        flags_at: 6,
        size_at: 22,
        name_len_at: 26,
        name_at: 30,
    },
    RecordLayout {
        signature: CENTRAL_HEADER,
        flags_at: 8,
        size_at: 24,
        name_len_at: 28,
        name_at: 46,
    },
];

/// Calls `patch` with the start offset of every local and central record
/// for `name`, and asserts there is exactly one of each.
fn patch_records(
    data: &mut [u8],
    name: &str,
    mut patch: impl FnMut(&mut [u8], usize, &RecordLayout),
) {
    let mut patched = 0;

    for layout in &RECORDS {
        let mut i = 0;
        while i + layout.name_at <= data.len() {
            if data[i..i + 4] == layout.signature {
                let len_at = i + layout.name_len_at;
                let len = usize::from(u16::from_le_bytes([data[len_at], data[len_at + 1]]));
                let name_at = i + layout.name_at;
                if data.get(name_at..name_at + len) == Some(name.as_bytes()) {
                    patch(data, i, layout);
                    patched += 1;
                }
            }
            i += 1;
        }
    }

    assert_eq!(patched, 2, "expected one local and one central record for {name}");
}

/// Rewrites the uncompressed size recorded for `name` in both the local
/// file header and the central directory.
pub fn forge_declared_size(mut data: Vec<u8>, name: &str, size: u32) -> Vec<u8> {
    patch_records(&mut data, name, |data, start, layout| {
        let at = start + layout.size_at;
        data[at..at + 4].copy_from_slice(&size.to_le_bytes());
    });
    data
}

/// Clears the UTF-8 name flag (general purpose bit 11) of `name`, leaving
/// the UTF-8 name bytes in place.
pub fn clear_utf8_flag(mut data: Vec<u8>, name: &str) -> Vec<u8> {
    patch_records(&mut data, name, |data, start, layout| {
        let at = start + layout.flags_at;
        let flags = u16::from_le_bytes([data[at], data[at + 1]]) & !0x0800;
        data[at..at + 2].copy_from_slice(&flags.to_le_bytes());
    });
    data
}
