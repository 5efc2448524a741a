//! Directory creation.

use std::fs;
use std::io;
use std::path::Path;

use burrow_core::{ExplorerError, Result, describe_io};
use tracing::info;

use crate::rename::validate_filename;
use crate::report::{OperationReport, OperationType};

/// Create the directory `parent / name`.
///
/// Fails with `AlreadyExists` when the name is taken (by any kind of entry)
/// and `CreateFailed` for invalid names or any other filesystem failure.
pub fn create_directory(parent: &Path, name: &str) -> Result<OperationReport> {
    let name = name.trim();
    let path = parent.join(name);

    validate_filename(name).map_err(|reason| ExplorerError::CreateFailed {
        path: path.clone(),
        reason,
    })?;

    if fs::symlink_metadata(&path).is_ok() {
        return Err(ExplorerError::AlreadyExists { path });
    }

    match fs::create_dir(&path) {
        Ok(()) => {
            info!(path = %path.display(), "created directory");
            Ok(OperationReport::new(OperationType::CreateDirectory, &path).with_destination(path))
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(ExplorerError::AlreadyExists { path }),
        Err(e) => Err(ExplorerError::CreateFailed {
            reason: describe_io(&e),
            path,
        }),
    }
}
