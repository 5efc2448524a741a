//! Error taxonomy for explorer operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout burrow.
pub type Result<T, E = ExplorerError> = std::result::Result<T, E>;

/// Every failure an explorer operation can report.
///
/// Low-level I/O errors are converted into one of these kinds at the point of
/// the filesystem call and never cross the engine boundary unwrapped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    /// A directory could not be listed (missing, not a directory, unreadable).
    #[error("Cannot list {path}: {reason}")]
    ListFailure { path: PathBuf, reason: String },

    /// The operation needs a target entry and none was given or selected.
    #[error("No entry selected")]
    NoSelection,

    /// Paste was requested with nothing staged.
    #[error("Nothing to paste")]
    NoClipboard,

    /// An entry with the requested name already exists.
    #[error("'{path}' already exists")]
    AlreadyExists { path: PathBuf },

    /// Directory creation failed.
    #[error("Cannot create {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// Rename failed.
    #[error("Cannot rename {path} to '{new_name}': {reason}")]
    RenameFailed {
        path: PathBuf,
        new_name: String,
        reason: String,
    },

    /// Deletion stopped short; some nodes may already be gone.
    #[error("Deletion of {path} incomplete ({removed} removed, {failed} failed): {reason}")]
    DeleteIncomplete {
        path: PathBuf,
        removed: usize,
        failed: usize,
        reason: String,
    },

    /// Copy or move failed; the destination may hold a partial copy.
    #[error("Cannot transfer {from} to {to}: {reason}")]
    TransferFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// Move copied the payload but could not remove the original.
    #[error("Moved {from} to {to} but the original could not be removed: {reason}")]
    MoveIncomplete {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// Already at the top: no readable parent and no history to fall back on.
    #[error("Already at the root ({path})")]
    NoParent { path: PathBuf },
}

impl ExplorerError {
    /// Create a listing failure from an I/O error.
    pub fn list(path: impl Into<PathBuf>, source: &io::Error) -> Self {
        Self::ListFailure {
            path: path.into(),
            reason: describe_io(source),
        }
    }

    /// Create a transfer failure from an I/O error.
    pub fn transfer(from: impl Into<PathBuf>, to: impl Into<PathBuf>, source: &io::Error) -> Self {
        Self::TransferFailed {
            from: from.into(),
            to: to.into(),
            reason: describe_io(source),
        }
    }

    /// Whether this is a boundary signal rather than a real failure.
    pub fn is_boundary(&self) -> bool {
        matches!(self, Self::NoParent { .. })
    }
}

/// Short human-readable description of an I/O error.
pub fn describe_io(error: &io::Error) -> String {
    match error.kind() {
        io::ErrorKind::NotFound => "not found".to_string(),
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        io::ErrorKind::AlreadyExists => "already exists".to_string(),
        io::ErrorKind::NotADirectory => "not a directory".to_string(),
        io::ErrorKind::StorageFull => "no space left on device".to_string(),
        _ => error.to_string(),
    }
}
