//! Security validation modules.

pub mod collision;
pub mod fold;
pub mod path;
pub mod quota;
pub mod validator;

// Re-export public types and functions
pub use collision::CollisionChecker;
pub use collision::CollisionError;
pub use fold::fold_path;
pub use path::PathError;
pub use path::check_portable;
pub use path::clean;
pub use path::validate_entry_path;
pub use quota::QuotaTracker;
pub use quota::check_archive_size;
pub use validator::ArchiveValidator;
pub use validator::ValidationReport;
pub use validator::validate_entries;
