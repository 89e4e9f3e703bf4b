//! Validation, fingerprinting and safe extraction of zip archives.
//!
//! `zipguard-core` checks that every entry of a zip archive has a clean,
//! portable path, that no two entries collide case-insensitively or as
//! file and directory, and that the declared content fits a size budget.
//! It computes an order-independent content fingerprint (`h1:...`) and
//! extracts verified archives without trusting declared sizes.
//!
//! # Examples
//!
//! ```no_run
//! use zipguard_core::NoopProgress;
//! use zipguard_core::SecurityConfig;
//! use zipguard_core::hash_archive;
//! use zipguard_core::unzip_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SecurityConfig::default();
//! let hash = hash_archive("module.zip", &config)?.fingerprint;
//!
//! let report = unzip_archive(
//!     "module.zip",
//!     hash.as_str(),
//!     "/output/dir",
//!     None,
//!     &config,
//!     &mut NoopProgress,
//! )?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod hash;
pub mod report;
pub mod security;

// Re-export main API types
pub use api::HashOutcome;
pub use api::hash_archive;
pub use api::unzip_archive;
pub use archive::Archive;
pub use archive::Entry;
pub use config::DEFAULT_MAX_SIZE;
pub use config::SecurityConfig;
pub use error::ArchiveError;
pub use error::EntryErrorKind;
pub use error::FileError;
pub use error::FileErrorList;
pub use error::QuotaResource;
pub use error::Result;
pub use extraction::Extractor;
pub use hash::ContentHasher;
pub use hash::Fingerprint;
pub use report::ExtractionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use security::ValidationReport;
