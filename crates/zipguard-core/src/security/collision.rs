//! Case-insensitive collision and file/directory conflict detection.

use std::collections::HashMap;

use thiserror::Error;

use super::fold::fold_path;

/// Reason an entry conflicts with a previously registered entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollisionError {
    /// Two distinct names fold to the same canonical form.
    #[error("case-insensitive file name collision: {existing:?} and {path:?}")]
    CaseCollision {
        /// Name registered first.
        existing: String,
        /// Name that collided with it.
        path: String,
    },

    /// The same path is used both as a file and as a directory.
    #[error("entry {path:?} is both a file and a directory")]
    FileAndDirectory {
        /// The conflicting path.
        path: String,
    },

    /// The same file path appears more than once.
    #[error("multiple entries for file {path:?}")]
    DuplicateFile {
        /// The duplicated path.
        path: String,
    },
}

#[derive(Debug, Clone)]
struct PathInfo {
    path: String,
    is_dir: bool,
}

/// Registry of every path seen during one validation pass.
///
/// Keys are folded with [`fold_path`]; values keep the original spelling so
/// that collisions can name both paths. Registering a path also registers
/// each of its ancestors as a directory.
///
/// # Examples
///
/// ```
/// use zipguard_core::security::CollisionChecker;
///
/// let mut checker = CollisionChecker::new();
/// assert!(checker.check("src/lib.rs", false).is_ok());
/// assert!(checker.check("src/main.rs", false).is_ok());
/// assert!(checker.check("SRC/other.rs", false).is_err());
/// ```
#[derive(Debug, Default)]
pub struct CollisionChecker {
    seen: HashMap<String, PathInfo>,
}

impl CollisionChecker {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `path` and its ancestor directories.
    ///
    /// `path` must already be clean. Re-registering an identical directory
    /// is not an error, since directories are visited again through every
    /// file they contain.
    ///
    /// # Errors
    ///
    /// Returns the first conflict found while walking from `path` up to its
    /// top-level segment. Paths registered before the conflict stay
    /// registered.
    pub fn check(&mut self, path: &str, is_dir: bool) -> Result<(), CollisionError> {
        let mut current = path;
        let mut current_is_dir = is_dir;

        loop {
            self.register(current, current_is_dir)?;
            match current.rfind('/') {
                Some(idx) => {
                    current = &current[..idx];
                    current_is_dir = true;
                }
                None => return Ok(()),
            }
        }
    }

    fn register(&mut self, path: &str, is_dir: bool) -> Result<(), CollisionError> {
        let folded = fold_path(path);

        if let Some(other) = self.seen.get(folded.as_ref()) {
            if other.path != path {
                return Err(CollisionError::CaseCollision {
                    existing: other.path.clone(),
                    path: path.to_string(),
                });
            }
            if other.is_dir != is_dir {
                return Err(CollisionError::FileAndDirectory {
                    path: path.to_string(),
                });
            }
            if !is_dir {
                return Err(CollisionError::DuplicateFile {
                    path: path.to_string(),
                });
            }
            return Ok(());
        }

        self.seen.insert(
            folded.into_owned(),
            PathInfo {
                path: path.to_string(),
                is_dir,
            },
        );
        Ok(())
    }

    /// Returns `true` if `path` (compared after folding) is registered as a
    /// directory.
    #[must_use]
    pub fn is_registered_dir(&self, path: &str) -> bool {
        self.seen
            .get(fold_path(path).as_ref())
            .is_some_and(|info| info.is_dir)
    }

    /// Returns the number of registered paths, implied directories included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
