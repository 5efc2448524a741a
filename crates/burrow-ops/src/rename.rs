//! Rename operation.

use std::fs;
use std::path::Path;

use burrow_core::{ExplorerError, Result, describe_io};
use tracing::info;

use crate::report::{OperationReport, OperationType};

/// Rename `path` to `new_name` within its parent directory.
///
/// Surrounding whitespace in `new_name` is ignored. There is no overwrite
/// check beyond what the filesystem itself enforces.
pub fn rename(path: &Path, new_name: &str) -> Result<OperationReport> {
    let new_name = new_name.trim();
    let fail = |reason: String| ExplorerError::RenameFailed {
        path: path.to_path_buf(),
        new_name: new_name.to_string(),
        reason,
    };

    validate_filename(new_name).map_err(fail)?;

    let parent = path.parent().ok_or_else(|| fail("no parent directory".into()))?;
    let new_path = parent.join(new_name);

    fs::rename(path, &new_path).map_err(|e| fail(describe_io(&e)))?;

    info!(from = %path.display(), to = %new_path.display(), "renamed");
    Ok(OperationReport::new(OperationType::Rename, path).with_destination(new_path))
}

/// Longest name most filesystems accept, in bytes.
const MAX_NAME_BYTES: usize = 255;

/// Characters no entry name may contain on any host.
const FORBIDDEN: [char; 2] = ['/', '\0'];

/// Additional characters Windows rejects in names.
#[cfg(windows)]
const FORBIDDEN_HOST: &[char] = &['\\', ':', '*', '?', '"', '<', '>', '|'];
#[cfg(not(windows))]
const FORBIDDEN_HOST: &[char] = &[];

/// Check that `name` can name a single entry inside a directory.
///
/// The error is a short reason suitable for `CreateFailed`/`RenameFailed`.
pub fn validate_filename(name: &str) -> Result<(), String> {
    match name {
        "" => return Err("name is empty".into()),
        "." | ".." => return Err(format!("'{name}' names a directory, not an entry")),
        _ => {}
    }

    if name.len() > MAX_NAME_BYTES {
        return Err(format!("name is longer than {MAX_NAME_BYTES} bytes"));
    }

    if let Some(c) = name
        .chars()
        .find(|c| FORBIDDEN.contains(c) || FORBIDDEN_HOST.contains(c))
    {
        return Err(format!("name contains '{}'", c.escape_default()));
    }

    if name.trim() != name {
        return Err("name starts or ends with whitespace".into());
    }

    Ok(())
}
