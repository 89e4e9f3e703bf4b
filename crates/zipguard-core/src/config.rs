//! Limits and policy for archive validation and extraction.

/// Default budget for the archive file and its uncompressed content (500 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 500 << 20;

/// Security configuration with strict default limits.
///
/// Passed by reference to every stage of the pipeline: opening the archive
/// (raw size), validation (declared sizes, path lengths) and extraction
/// (file permissions).
///
/// # Examples
///
/// ```
/// use zipguard_core::SecurityConfig;
///
/// // Use strict defaults
/// let config = SecurityConfig::default();
///
/// // Tighten the content budget
/// let custom = SecurityConfig::default()
///     .with_max_total_size(100 * 1024 * 1024)
///     .with_max_file_size(10 * 1024 * 1024);
/// assert!(custom.max_total_size < config.max_total_size);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Maximum size of the zip container itself in bytes.
    pub max_archive_size: u64,

    /// Maximum sum of declared uncompressed sizes of all files in bytes.
    pub max_total_size: u64,

    /// Maximum declared uncompressed size of a single file in bytes.
    pub max_file_size: u64,

    /// Maximum length of one path segment in bytes.
    pub max_component_len: usize,

    /// Maximum length of a whole entry path in bytes.
    pub max_path_len: usize,

    /// Permission bits applied to every extracted file (Unix only).
    pub file_mode: u32,
}

impl Default for SecurityConfig {
    /// Creates a `SecurityConfig` with strict default settings.
    ///
    /// Default values:
    /// - `max_archive_size`: 500 MiB
    /// - `max_total_size`: 500 MiB
    /// - `max_file_size`: 500 MiB
    /// - `max_component_len`: 255
    /// - `max_path_len`: 4096
    /// - `file_mode`: `0o755`
    fn default() -> Self {
        Self {
            max_archive_size: DEFAULT_MAX_SIZE,
            max_total_size: DEFAULT_MAX_SIZE,
            max_file_size: DEFAULT_MAX_SIZE,
            max_component_len: 255,
            max_path_len: 4096,
            file_mode: 0o755,
        }
    }
}

impl SecurityConfig {
    /// Sets the same budget for the archive file, the total content and a
    /// single file.
    #[must_use]
    pub fn with_budget(mut self, bytes: u64) -> Self {
        self.max_archive_size = bytes;
        self.max_total_size = bytes;
        self.max_file_size = bytes;
        self
    }

    /// Sets the maximum archive file size.
    #[must_use]
    pub fn with_max_archive_size(mut self, bytes: u64) -> Self {
        self.max_archive_size = bytes;
        self
    }

    /// Sets the maximum total declared uncompressed size.
    #[must_use]
    pub fn with_max_total_size(mut self, bytes: u64) -> Self {
        self.max_total_size = bytes;
        self
    }

    /// Sets the maximum declared size of a single file.
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Sets the permission bits of extracted files.
    #[must_use]
    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SecurityConfig::default();
        assert_eq!(config.max_archive_size, 500 * 1024 * 1024);
        assert_eq!(config.max_total_size, 500 * 1024 * 1024);
        assert_eq!(config.max_file_size, 500 * 1024 * 1024);
        assert_eq!(config.file_mode, 0o755);
    }

    #[test]
    fn test_with_budget_sets_all_limits() {
        let config = SecurityConfig::default().with_budget(1000);
        assert_eq!(config.max_archive_size, 1000);
        assert_eq!(config.max_total_size, 1000);
        assert_eq!(config.max_file_size, 1000);
    }

    #[test]
    fn test_individual_setters() {
        let config = SecurityConfig::default()
            .with_max_archive_size(1)
            .with_max_total_size(2)
            .with_max_file_size(3)
            .with_file_mode(0o644);
        assert_eq!(config.max_archive_size, 1);
        assert_eq!(config.max_total_size, 2);
        assert_eq!(config.max_file_size, 3);
        assert_eq!(config.file_mode, 0o644);
    }
}
