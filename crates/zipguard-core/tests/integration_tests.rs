//! Integration tests for zipguard-core.
//!
//! These tests build real zip files and drive the public pipelines end to
//! end on the filesystem.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::fs;
use std::path::Path;

use common::ZipBuilder;
use common::clear_utf8_flag;
use common::forge_declared_size;
use tempfile::TempDir;
use zipguard_core::Archive;
use zipguard_core::ArchiveError;
use zipguard_core::ContentHasher;
use zipguard_core::Extractor;
use zipguard_core::NoopProgress;
use zipguard_core::ProgressCallback;
use zipguard_core::QuotaResource;
use zipguard_core::SecurityConfig;
use zipguard_core::hash_archive;
use zipguard_core::unzip_archive;

fn fingerprint_of(path: &Path) -> String {
    let mut archive = Archive::open(path, &SecurityConfig::default()).unwrap();
    archive.fingerprint().unwrap().to_string()
}

#[test]
fn test_directory_marker_and_prefix_scenario() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .directory("a/")
        .file("a/b.txt", b"hi")
        .write_to(temp.path(), "m.zip");
    let config = SecurityConfig::default();

    let outcome = hash_archive(&zip, &config).unwrap();
    assert_eq!(outcome.report.valid, vec!["a/b.txt".to_string()]);

    let mut expected = ContentHasher::new();
    expected.add_file("a/b.txt", &b"hi"[..]).unwrap();
    assert_eq!(outcome.fingerprint, expected.finish());

    let target = temp.path().join("out");
    let report = unzip_archive(
        &zip,
        outcome.fingerprint.as_str(),
        &target,
        Some("a"),
        &config,
        &mut NoopProgress,
    )
    .unwrap();

    assert_eq!(fs::read_to_string(target.join("b.txt")).unwrap(), "hi");
    assert!(!target.join("a").exists());
    assert_eq!(report.files_extracted, 1);
    assert_eq!(report.bytes_written, 2);
}

#[test]
fn test_extract_without_prefix_keeps_layout() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .file("x/y/z.txt", b"deep")
        .deflated("top.txt", b"top level")
        .write_to(temp.path(), "m.zip");
    let hash = fingerprint_of(&zip);

    let target = temp.path().join("out");
    let report = unzip_archive(
        &zip,
        &hash,
        &target,
        None,
        &SecurityConfig::default(),
        &mut NoopProgress,
    )
    .unwrap();

    assert_eq!(fs::read_to_string(target.join("x/y/z.txt")).unwrap(), "deep");
    assert_eq!(fs::read_to_string(target.join("top.txt")).unwrap(), "top level");
    assert_eq!(report.files_extracted, 2);
    assert_eq!(report.directories_created, 1);
}

#[test]
fn test_case_collision_rejected_but_hashable() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .file("A", b"upper")
        .file("a", b"lower")
        .write_to(temp.path(), "m.zip");
    let config = SecurityConfig::default();

    let err = hash_archive(&zip, &config).unwrap_err();
    assert!(err.is_entry_error());
    let msg = err.to_string();
    assert!(msg.contains("\"A\""), "{msg}");
    assert!(msg.contains("\"a\""), "{msg}");

    // Hashing does not depend on validation.
    let hash = fingerprint_of(&zip);
    assert!(hash.starts_with("h1:"));

    let target = temp.path().join("out");
    let err = unzip_archive(&zip, &hash, &target, None, &config, &mut NoopProgress).unwrap_err();
    assert!(err.is_entry_error());
    assert!(!target.exists());
}

#[test]
fn test_path_traversal_rejected_before_writing() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .file("ok.txt", b"fine")
        .file("../evil.txt", b"escape")
        .write_to(temp.path(), "m.zip");
    let hash = fingerprint_of(&zip);

    let target = temp.path().join("out");
    let err = unzip_archive(
        &zip,
        &hash,
        &target,
        None,
        &SecurityConfig::default(),
        &mut NoopProgress,
    )
    .unwrap_err();

    let entries = err.invalid_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "../evil.txt");
    assert!(!temp.path().join("evil.txt").exists());
    assert!(!target.exists());
}

#[test]
fn test_total_size_one_byte_over_budget() {
    let temp = TempDir::new().unwrap();
    let at_budget = ZipBuilder::new()
        .file("a", &[0u8; 6])
        .file("b", &[0u8; 4])
        .write_to(temp.path(), "at.zip");
    let over_budget = ZipBuilder::new()
        .file("a", &[0u8; 6])
        .file("b", &[0u8; 5])
        .write_to(temp.path(), "over.zip");

    let config = SecurityConfig::default().with_max_total_size(10);
    assert!(hash_archive(&at_budget, &config).is_ok());

    let err = hash_archive(&over_budget, &config).unwrap_err();
    assert_eq!(
        err.quota_resource(),
        Some(&QuotaResource::TotalSize { max: 10 })
    );
}

#[test]
fn test_size_error_dominates_invalid_entries() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .file("bad:name", b"")
        .file("big", &[0u8; 32])
        .write_to(temp.path(), "m.zip");

    let config = SecurityConfig::default().with_max_total_size(16);
    let err = hash_archive(&zip, &config).unwrap_err();
    assert!(err.quota_resource().is_some());
    assert!(!err.to_string().contains("bad:name"));

    let archive = Archive::open(&zip, &config).unwrap();
    let report = archive.validate(&config);
    assert_eq!(report.invalid.len(), 1);
    assert_eq!(report.invalid[0].path, "bad:name");
}

#[test]
fn test_raw_archive_size_checked_first() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .file("a", b"content")
        .write_to(temp.path(), "m.zip");
    let size = fs::metadata(&zip).unwrap().len();

    let config = SecurityConfig::default().with_max_archive_size(size - 1);
    let err = hash_archive(&zip, &config).unwrap_err();
    assert_eq!(
        err.quota_resource(),
        Some(&QuotaResource::ArchiveSize {
            size,
            max: size - 1
        })
    );
}

#[test]
fn test_declared_size_exact_succeeds() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .deflated("f", b"0123456789")
        .write_to(temp.path(), "m.zip");
    let config = SecurityConfig::default();

    let mut archive = Archive::open(&zip, &config).unwrap();
    assert_eq!(archive.entries()[0].declared_size, 10);
    archive.validate(&config).check().unwrap();

    let target = temp.path().join("out");
    let report = Extractor::new(&target, &config)
        .extract(&mut archive, &mut NoopProgress)
        .unwrap();
    assert_eq!(report.bytes_written, 10);
    assert_eq!(fs::read(target.join("f")).unwrap(), b"0123456789");
}

#[test]
fn test_declared_size_exceeded_by_one_byte() {
    let temp = TempDir::new().unwrap();
    let data = ZipBuilder::new()
        .deflated("f", b"0123456789X")
        .build();
    let zip = temp.path().join("forged.zip");
    fs::write(&zip, forge_declared_size(data, "f", 10)).unwrap();
    let config = SecurityConfig::default();

    let mut archive = Archive::open(&zip, &config).unwrap();
    assert_eq!(archive.entries()[0].declared_size, 10);
    archive.validate(&config).check().unwrap();

    let target = temp.path().join("out");
    let err = Extractor::new(&target, &config)
        .extract(&mut archive, &mut NoopProgress)
        .unwrap_err();
    assert!(matches!(
        err,
        ArchiveError::DeclaredSizeExceeded { ref path, declared: 10 } if path == "f"
    ));

    // The partial file stays behind, holding exactly the declared bytes.
    assert_eq!(fs::read(target.join("f")).unwrap(), b"0123456789");
}

#[test]
fn test_unflagged_utf8_names_read_as_utf8() {
    let temp = TempDir::new().unwrap();
    let data = ZipBuilder::new().file("日本.txt", b"hi").build();
    let zip = temp.path().join("unflagged.zip");
    fs::write(&zip, clear_utf8_flag(data, "日本.txt")).unwrap();
    let config = SecurityConfig::default();

    let outcome = hash_archive(&zip, &config).unwrap();
    assert_eq!(outcome.report.valid, vec!["日本.txt".to_string()]);

    let mut expected = ContentHasher::new();
    expected.add_file("日本.txt", &b"hi"[..]).unwrap();
    assert_eq!(outcome.fingerprint, expected.finish());
}

#[test]
fn test_hash_mismatch_names_both_values() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .file("a", b"x")
        .write_to(temp.path(), "m.zip");
    let actual = fingerprint_of(&zip);

    let target = temp.path().join("out");
    let err = unzip_archive(
        &zip,
        "h1:not-the-hash",
        &target,
        None,
        &SecurityConfig::default(),
        &mut NoopProgress,
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("got hash {actual}, expected h1:not-the-hash")
    );
    assert!(!target.exists());
}

#[test]
fn test_non_empty_target_rejected() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .file("a", b"x")
        .write_to(temp.path(), "m.zip");
    let hash = fingerprint_of(&zip);

    let target = temp.path().join("out");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("existing"), b"keep").unwrap();

    let err = unzip_archive(
        &zip,
        &hash,
        &target,
        None,
        &SecurityConfig::default(),
        &mut NoopProgress,
    )
    .unwrap_err();

    assert!(matches!(err, ArchiveError::TargetNotEmpty { .. }));
    assert!(!target.join("a").exists());
    assert_eq!(fs::read_dir(&target).unwrap().count(), 1);
}

#[test]
fn test_existing_empty_target_accepted() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .file("a", b"x")
        .write_to(temp.path(), "m.zip");
    let hash = fingerprint_of(&zip);

    let target = temp.path().join("out");
    fs::create_dir(&target).unwrap();

    unzip_archive(
        &zip,
        &hash,
        &target,
        None,
        &SecurityConfig::default(),
        &mut NoopProgress,
    )
    .unwrap();
    assert!(target.join("a").is_file());
}

#[test]
fn test_prefix_not_matched() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .file("pkg/a.txt", b"x")
        .file("pkgother/b.txt", b"y")
        .write_to(temp.path(), "m.zip");
    let hash = fingerprint_of(&zip);

    let err = unzip_archive(
        &zip,
        &hash,
        temp.path().join("out"),
        Some("other"),
        &SecurityConfig::default(),
        &mut NoopProgress,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "no file matched prefix \"other\"");
}

#[test]
fn test_prefix_skips_non_matching_files() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .file("pkg/a.txt", b"x")
        .file("pkgother/b.txt", b"y")
        .file("README", b"z")
        .write_to(temp.path(), "m.zip");
    let hash = fingerprint_of(&zip);

    let target = temp.path().join("out");
    let report = unzip_archive(
        &zip,
        &hash,
        &target,
        Some("pkg"),
        &SecurityConfig::default(),
        &mut NoopProgress,
    )
    .unwrap();

    assert_eq!(report.files_extracted, 1);
    assert_eq!(report.files_skipped, 2);
    assert!(target.join("a.txt").is_file());
    assert!(!target.join("b.txt").exists());
    assert!(!target.join("README").exists());
}

#[test]
fn test_fingerprint_independent_of_order_and_compression() {
    let temp = TempDir::new().unwrap();
    let first = ZipBuilder::new()
        .directory("d")
        .file("d/one.txt", b"first file")
        .file("two.txt", b"second file")
        .write_to(temp.path(), "first.zip");
    let second = ZipBuilder::new()
        .deflated("two.txt", b"second file")
        .deflated("d/one.txt", b"first file")
        .write_to(temp.path(), "second.zip");

    assert_eq!(fingerprint_of(&first), fingerprint_of(&second));
}

#[test]
fn test_fingerprint_changes_with_content() {
    let temp = TempDir::new().unwrap();
    let first = ZipBuilder::new()
        .file("a", b"one")
        .write_to(temp.path(), "first.zip");
    let second = ZipBuilder::new()
        .file("a", b"two")
        .write_to(temp.path(), "second.zip");

    assert_ne!(fingerprint_of(&first), fingerprint_of(&second));
}

#[cfg(unix)]
#[test]
fn test_extracted_files_get_fixed_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .file("script.sh", b"#!/bin/sh\n")
        .write_to(temp.path(), "m.zip");
    let hash = fingerprint_of(&zip);

    let config = SecurityConfig::default().with_file_mode(0o750);
    let target = temp.path().join("out");
    unzip_archive(&zip, &hash, &target, None, &config, &mut NoopProgress).unwrap();

    let mode = fs::metadata(target.join("script.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o750);
}

#[derive(Default)]
struct RecordingProgress {
    started: Vec<String>,
    positions: Vec<(usize, usize)>,
    completed: usize,
    bytes: u64,
    finished: bool,
}

impl ProgressCallback for RecordingProgress {
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
        self.started.push(path.display().to_string());
        self.positions.push((current, total));
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes += bytes;
    }

    fn on_entry_complete(&mut self, _path: &Path) {
        self.completed += 1;
    }

    fn on_complete(&mut self) {
        self.finished = true;
    }
}

#[test]
fn test_progress_callbacks() {
    let temp = TempDir::new().unwrap();
    let zip = ZipBuilder::new()
        .directory("m/")
        .file("m/a", b"aaaa")
        .file("other/c", b"c")
        .file("m/b", b"bb")
        .write_to(temp.path(), "m.zip");
    let hash = fingerprint_of(&zip);

    let mut progress = RecordingProgress::default();
    unzip_archive(
        &zip,
        &hash,
        temp.path().join("out"),
        Some("m"),
        &SecurityConfig::default(),
        &mut progress,
    )
    .unwrap();

    assert_eq!(progress.started, vec!["a", "b"]);
    // Directory markers and files outside the prefix are not counted.
    assert_eq!(progress.positions, vec![(1, 2), (2, 2)]);
    assert_eq!(progress.completed, 2);
    assert_eq!(progress.bytes, 6);
    assert!(progress.finished);
}
