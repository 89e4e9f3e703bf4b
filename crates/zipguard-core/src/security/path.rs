//! Entry path validation.
//!
//! An entry name is accepted only if it is already in clean form and every
//! segment is portable across the common filesystems (Windows, macOS, Linux).
//! Validation is purely lexical and never touches the filesystem.

use thiserror::Error;
use unicode_general_category::GeneralCategory;
use unicode_general_category::get_general_category;

use crate::SecurityConfig;

/// ASCII punctuation allowed in a path segment besides letters and digits.
///
/// Quotes, backticks, `*`, `<`, `>`, `?` and `|` are left out, as are the
/// separators `/`, `:` and `\`.
const ALLOWED_PUNCTUATION: &str = "!#$%&()+,-.=@[]^_{}~ ";

/// Device names Windows reserves regardless of extension.
const RESERVED_WINDOWS_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reason an entry path was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Path has redundant separators, `.`/`..` segments or a leading `/`.
    #[error("file path is not clean")]
    NotClean,

    /// The raw entry name is not valid UTF-8.
    #[error("invalid UTF-8")]
    InvalidUtf8,

    /// Path is the empty string.
    #[error("empty string")]
    Empty,

    /// Path contains `//`.
    #[error("double slash")]
    DoubleSlash,

    /// Path ends with `/`.
    #[error("trailing slash")]
    TrailingSlash,

    /// A segment between two separators is empty.
    #[error("empty path element")]
    EmptyElement,

    /// A segment consists only of dots.
    #[error("invalid path element {0:?}")]
    InvalidElement(String),

    /// A segment ends with a dot.
    #[error("trailing dot in path element")]
    TrailingDot,

    /// A segment contains a character outside the portable set.
    #[error("invalid char {0:?}")]
    InvalidChar(char),

    /// A segment names a reserved Windows device.
    #[error("{0:?} disallowed as path element component on Windows")]
    ReservedName(String),

    /// A segment is longer than allowed.
    #[error("path element too long ({len} bytes; limit is {max} bytes)")]
    ElementTooLong {
        /// Segment length in bytes.
        len: usize,
        /// Maximum allowed length in bytes.
        max: usize,
    },

    /// The whole path is longer than allowed.
    #[error("file path too long ({len} bytes; limit is {max} bytes)")]
    PathTooLong {
        /// Path length in bytes.
        len: usize,
        /// Maximum allowed length in bytes.
        max: usize,
    },
}

/// Validates an entry path (trailing separator of directories already
/// stripped).
///
/// Checks run in order and the first failure wins:
/// 1. the path must be clean (see [`is_clean`])
/// 2. the path must be portable (see [`check_portable`])
///
/// # Examples
///
/// ```
/// use zipguard_core::SecurityConfig;
/// use zipguard_core::security::PathError;
/// use zipguard_core::security::validate_entry_path;
///
/// let config = SecurityConfig::default();
/// assert!(validate_entry_path("src/lib.rs", &config).is_ok());
/// assert_eq!(
///     validate_entry_path("../etc/passwd", &config),
///     Err(PathError::NotClean)
/// );
/// assert_eq!(
///     validate_entry_path("a:b", &config),
///     Err(PathError::InvalidChar(':'))
/// );
/// ```
pub fn validate_entry_path(path: &str, config: &SecurityConfig) -> Result<(), PathError> {
    if !is_clean(path) {
        return Err(PathError::NotClean);
    }
    check_portable(path, config)
}

/// Returns `true` if `path` is a clean relative path.
///
/// A clean path equals its own [`clean`] form, does not start with `/` and
/// has no `.` or `..` segment.
#[must_use]
pub fn is_clean(path: &str) -> bool {
    !path.starts_with('/')
        && !path.split('/').any(|segment| segment == "." || segment == "..")
        && clean(path) == path
}

/// Returns the shortest lexically equivalent form of a slash-separated path.
///
/// Repeated separators collapse, `.` segments vanish, `..` removes the
/// preceding segment where one exists, and an empty result becomes `.`.
///
/// # Examples
///
/// ```
/// use zipguard_core::security::clean;
///
/// assert_eq!(clean("a//b/./c/"), "a/b/c");
/// assert_eq!(clean("a/../../b"), "../b");
/// assert_eq!(clean("/../a"), "/a");
/// assert_eq!(clean(""), ".");
/// ```
#[must_use]
pub fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Checks that a path is safe to create on every common filesystem.
///
/// # Errors
///
/// Returns the first violated constraint.
pub fn check_portable(path: &str, config: &SecurityConfig) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if path.contains("//") {
        return Err(PathError::DoubleSlash);
    }
    if path.ends_with('/') {
        return Err(PathError::TrailingSlash);
    }
    if path.len() > config.max_path_len {
        return Err(PathError::PathTooLong {
            len: path.len(),
            max: config.max_path_len,
        });
    }

    path.split('/')
        .try_for_each(|segment| check_segment(segment, config))
}

fn check_segment(segment: &str, config: &SecurityConfig) -> Result<(), PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptyElement);
    }
    if segment.bytes().all(|b| b == b'.') {
        return Err(PathError::InvalidElement(segment.to_string()));
    }
    if segment.ends_with('.') {
        return Err(PathError::TrailingDot);
    }
    if segment.len() > config.max_component_len {
        return Err(PathError::ElementTooLong {
            len: segment.len(),
            max: config.max_component_len,
        });
    }
    if let Some(c) = segment.chars().find(|&c| !is_portable_char(c)) {
        return Err(PathError::InvalidChar(c));
    }

    let stem = segment.split('.').next().unwrap_or(segment);
    if RESERVED_WINDOWS_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
    {
        return Err(PathError::ReservedName(stem.to_string()));
    }

    Ok(())
}

fn is_portable_char(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric() || ALLOWED_PUNCTUATION.contains(c);
    }
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::field_reassign_with_default)]
mod tests {
    use super::*;

    fn validate(path: &str) -> Result<(), PathError> {
        validate_entry_path(path, &SecurityConfig::default())
    }

    #[test]
    fn test_valid_paths() {
        assert!(validate("file.txt").is_ok());
        assert!(validate("src/lib.rs").is_ok());
        assert!(validate("a/b/c/d.tar.gz").is_ok());
        assert!(validate(".gitignore").is_ok());
        assert!(validate("dir with space/x").is_ok());
        assert!(validate("docs/日本語.md").is_ok());
        assert!(validate("a/{b}/[c]/~d!").is_ok());
    }

    #[test]
    fn test_not_clean() {
        assert_eq!(validate("a//b"), Err(PathError::NotClean));
        assert_eq!(validate("./a"), Err(PathError::NotClean));
        assert_eq!(validate("a/./b"), Err(PathError::NotClean));
        assert_eq!(validate("a/../b"), Err(PathError::NotClean));
        assert_eq!(validate("../a"), Err(PathError::NotClean));
        assert_eq!(validate(".."), Err(PathError::NotClean));
        assert_eq!(validate("."), Err(PathError::NotClean));
        assert_eq!(validate("/etc/passwd"), Err(PathError::NotClean));
        assert_eq!(validate(""), Err(PathError::NotClean));
        assert_eq!(validate("a/"), Err(PathError::NotClean));
    }

    #[test]
    fn test_invalid_characters() {
        for (path, c) in [
            ("a:b", ':'),
            ("a*b", '*'),
            ("a?b", '?'),
            ("a\"b", '"'),
            ("a<b", '<'),
            ("a>b", '>'),
            ("a|b", '|'),
            ("a\\b", '\\'),
            ("a'b", '\''),
            ("a`b", '`'),
            ("a\u{0}b", '\u{0}'),
            ("a\nb", '\n'),
            ("a\u{7f}b", '\u{7f}'),
        ] {
            assert_eq!(validate(path), Err(PathError::InvalidChar(c)), "{path:?}");
        }
    }

    #[test]
    fn test_non_letter_unicode_rejected() {
        assert_eq!(validate("a\u{200b}b"), Err(PathError::InvalidChar('\u{200b}')));
        assert_eq!(validate("☃"), Err(PathError::InvalidChar('☃')));
    }

    #[test]
    fn test_alphabetic_non_letters_rejected() {
        // Letter number (Nl)
        assert_eq!(validate("\u{216B}"), Err(PathError::InvalidChar('\u{216B}')));
        // Combining marks with the Alphabetic property
        assert_eq!(validate("a\u{0345}"), Err(PathError::InvalidChar('\u{0345}')));
        assert_eq!(
            validate("\u{915}\u{93F}"),
            Err(PathError::InvalidChar('\u{93F}'))
        );
        // Modifier and other letters stay valid
        assert!(validate("\u{2B0}x").is_ok());
        assert!(validate("\u{915}").is_ok());
        assert!(validate("Ǆemal").is_ok());
    }

    #[test]
    fn test_trailing_dot_rejected() {
        assert_eq!(validate("a./b"), Err(PathError::TrailingDot));
        assert_eq!(validate("file."), Err(PathError::TrailingDot));
    }

    #[test]
    fn test_dot_only_element_rejected() {
        assert_eq!(
            validate("a/..."),
            Err(PathError::InvalidElement("...".to_string()))
        );
    }

    #[test]
    fn test_reserved_windows_names() {
        assert_eq!(
            validate("con"),
            Err(PathError::ReservedName("con".to_string()))
        );
        assert_eq!(
            validate("dir/Aux.txt"),
            Err(PathError::ReservedName("Aux".to_string()))
        );
        assert_eq!(
            validate("LPT9.tar.gz"),
            Err(PathError::ReservedName("LPT9".to_string()))
        );
        assert!(validate("console.log").is_ok());
        assert!(validate("COM10").is_ok());
    }

    #[test]
    fn test_length_limits() {
        let mut config = SecurityConfig::default();
        config.max_component_len = 8;
        config.max_path_len = 20;

        assert!(validate_entry_path("abcdefgh/abcdefgh", &config).is_ok());
        assert_eq!(
            validate_entry_path("abcdefghi", &config),
            Err(PathError::ElementTooLong { len: 9, max: 8 })
        );
        assert_eq!(
            validate_entry_path("abcd/abcd/abcd/abcd/a", &config),
            Err(PathError::PathTooLong { len: 21, max: 20 })
        );
    }

    #[test]
    fn test_check_portable_structural_errors() {
        let config = SecurityConfig::default();
        assert_eq!(check_portable("", &config), Err(PathError::Empty));
        assert_eq!(check_portable("a//b", &config), Err(PathError::DoubleSlash));
        assert_eq!(check_portable("a/", &config), Err(PathError::TrailingSlash));
        assert_eq!(check_portable("/a", &config), Err(PathError::EmptyElement));
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean("a/b"), "a/b");
        assert_eq!(clean("a//b"), "a/b");
        assert_eq!(clean("a/./b/"), "a/b");
        assert_eq!(clean("a/b/../c"), "a/c");
        assert_eq!(clean("../../a"), "../../a");
        assert_eq!(clean("/.."), "/");
        assert_eq!(clean("."), ".");
        assert_eq!(clean(""), ".");
    }

    #[test]
    fn test_is_clean() {
        assert!(is_clean("a/b/c"));
        assert!(!is_clean("../a"));
        assert!(!is_clean("/a"));
        assert!(!is_clean("a/b/"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(PathError::NotClean.to_string(), "file path is not clean");
        assert_eq!(PathError::InvalidChar(':').to_string(), "invalid char ':'");
        assert_eq!(
            PathError::ReservedName("CON".into()).to_string(),
            "\"CON\" disallowed as path element component on Windows"
        );
        assert!(validate("a:b").unwrap_err().to_string().contains("':'"));
    }
}
