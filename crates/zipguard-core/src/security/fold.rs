//! Case folding for collision detection.
//!
//! [`fold_path`] maps a string to a canonical form such that two strings are
//! equal under simple Unicode case folding iff their folded forms are
//! byte-identical. This lets the collision checker find fold-equivalent
//! names with a single hash map lookup instead of comparing every pair.
//!
//! Plain `to_lowercase` is not enough: the Kelvin sign, the long s, the
//! micro sign and the Greek final sigma all lowercase to themselves or to a
//! different letter than their case partners do. Each character is instead
//! mapped to the lowercase form of its simple uppercase form, which is the
//! same for every member of a folding class.

use std::borrow::Cow;

/// Turkic dotted/dotless i only fold under locale-specific rules.
const NO_SIMPLE_FOLD: &[char] = &['\u{130}', '\u{131}'];

/// Returns the canonical folded form of `s`.
///
/// Paths that are entirely ASCII without upper case letters are returned
/// borrowed.
///
/// # Examples
///
/// ```
/// use zipguard_core::security::fold_path;
///
/// assert_eq!(fold_path("Foo.TXT"), fold_path("foo.txt"));
/// assert_eq!(fold_path("\u{212A}elvin"), fold_path("kelvin"));
/// assert_ne!(fold_path("a"), fold_path("b"));
/// ```
#[must_use]
pub fn fold_path(s: &str) -> Cow<'_, str> {
    if s.bytes().all(|b| b.is_ascii() && !b.is_ascii_uppercase()) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().map(fold_char).collect())
}

/// Folds a single character to its canonical representative.
#[must_use]
pub fn fold_char(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }
    if NO_SIMPLE_FOLD.contains(&c) {
        return c;
    }
    // Multi-character mappings (ß -> SS, ᾳ -> ΑΙ) are full folding, not simple.
    let upper = single_char(c.to_uppercase()).unwrap_or(c);
    single_char(upper.to_lowercase()).unwrap_or(upper)
}

fn single_char(mut mapping: impl Iterator<Item = char>) -> Option<char> {
    let first = mapping.next()?;
    mapping.next().is_none().then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_lowercase_borrowed() {
        assert!(matches!(fold_path("src/main.rs"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_ascii_uppercase_folded() {
        assert_eq!(fold_path("README.md"), "readme.md");
        assert_eq!(fold_path("Foo.txt"), fold_path("foo.txt"));
    }

    #[test]
    fn test_kelvin_sign_folds_with_k() {
        assert_eq!(fold_char('\u{212A}'), 'k');
        assert_eq!(fold_char('K'), 'k');
    }

    #[test]
    fn test_sharp_s_folds_with_capital_sharp_s() {
        assert_eq!(fold_char('ß'), fold_char('ẞ'));
        assert_eq!(fold_path("ſtraße"), fold_path("STRAẞE"));
    }

    #[test]
    fn test_sharp_s_does_not_fold_to_double_s() {
        assert_ne!(fold_path("straße"), fold_path("strasse"));
    }

    #[test]
    fn test_greek_sigma_class() {
        let folded = fold_char('σ');
        assert_eq!(fold_char('Σ'), folded);
        assert_eq!(fold_char('ς'), folded);
    }

    #[test]
    fn test_micro_sign_folds_with_mu() {
        assert_eq!(fold_char('µ'), fold_char('μ'));
        assert_eq!(fold_char('Μ'), fold_char('μ'));
    }

    #[test]
    fn test_angstrom_sign_folds_with_a_ring() {
        assert_eq!(fold_char('\u{212B}'), fold_char('å'));
        assert_eq!(fold_char('Å'), fold_char('å'));
    }

    #[test]
    fn test_titlecase_digraph_class() {
        assert_eq!(fold_char('ǅ'), fold_char('ǆ'));
        assert_eq!(fold_char('Ǆ'), fold_char('ǆ'));
    }

    #[test]
    fn test_turkic_i_not_folded() {
        assert_ne!(fold_char('\u{131}'), fold_char('i'));
        assert_ne!(fold_char('\u{130}'), fold_char('i'));
    }

    #[test]
    fn test_uncased_characters_unchanged() {
        assert_eq!(fold_char('日'), '日');
        assert_eq!(fold_path("日本/語"), "日本/語");
    }
}
