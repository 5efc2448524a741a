//! Recursive, best-effort deletion.

use std::fs;
use std::path::Path;

use burrow_core::{ExplorerConfig, ExplorerError, Result, describe_io};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::report::{OperationReport, OperationType};

/// Options for deletions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteOptions {
    /// Move to the system trash instead of unlinking.
    pub use_trash: bool,
}

impl From<&ExplorerConfig> for DeleteOptions {
    fn from(config: &ExplorerConfig) -> Self {
        Self {
            use_trash: config.use_trash,
        }
    }
}

/// Delete a file, or a directory with everything below it.
///
/// Directory trees are removed contents-first and the walk keeps going past
/// individual failures. Anything left behind is reported as
/// `DeleteIncomplete` with the number of nodes removed and not removed.
/// Symlinks are unlinked, never followed.
pub fn delete(path: &Path, options: &DeleteOptions) -> Result<OperationReport> {
    let incomplete = |removed: usize, failed: usize, reason: String| ExplorerError::DeleteIncomplete {
        path: path.to_path_buf(),
        removed,
        failed,
        reason,
    };

    let metadata = fs::symlink_metadata(path).map_err(|e| incomplete(0, 1, describe_io(&e)))?;

    if options.use_trash {
        trash::delete(path).map_err(|e| incomplete(0, 1, e.to_string()))?;
        info!(path = %path.display(), "moved to trash");
        return Ok(OperationReport::new(OperationType::Delete, path));
    }

    if !metadata.is_dir() {
        let bytes = metadata.len();
        fs::remove_file(path).map_err(|e| incomplete(0, 1, describe_io(&e)))?;
        info!(path = %path.display(), "deleted file");
        return Ok(OperationReport::new(OperationType::Delete, path).with_counts(1, bytes));
    }

    let mut removed = 0;
    let mut failed = 0;
    let mut bytes = 0u64;
    let mut first_error: Option<String> = None;

    for item in WalkDir::new(path).follow_links(false).contents_first(true) {
        let outcome = item.map_err(|e| e.to_string()).and_then(|entry| {
            let size = if entry.file_type().is_file() {
                entry.metadata().map(|m| m.len()).unwrap_or(0)
            } else {
                0
            };
            let result = if entry.file_type().is_dir() {
                fs::remove_dir(entry.path())
            } else {
                fs::remove_file(entry.path())
            };
            result
                .map(|()| size)
                .map_err(|e| format!("{}: {}", entry.path().display(), describe_io(&e)))
        });

        match outcome {
            Ok(size) => {
                removed += 1;
                bytes += size;
            }
            Err(reason) => {
                warn!(root = %path.display(), %reason, "delete step failed");
                failed += 1;
                first_error.get_or_insert(reason);
            }
        }
    }

    if let Some(reason) = first_error {
        return Err(incomplete(removed, failed, reason));
    }

    info!(path = %path.display(), removed, "deleted directory tree");
    Ok(OperationReport::new(OperationType::Delete, path).with_counts(removed, bytes))
}
