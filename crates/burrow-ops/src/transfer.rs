//! Copy and move execution for staged transfers.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use burrow_core::{ConflictPolicy, DirectoryPaste, ExplorerConfig, ExplorerError, Result, describe_io};
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info};

use crate::conflict::{Resolution, auto_rename_path, resolve_collision};
use crate::report::{OperationReport, OperationType};

/// Whether a transfer keeps or removes its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum TransferKind {
    Copy,
    Move,
}

impl TransferKind {
    fn operation_type(self) -> OperationType {
        match self {
            Self::Copy => OperationType::Copy,
            Self::Move => OperationType::Move,
        }
    }
}

/// Options for transfers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferOptions {
    /// How to handle an occupied target name.
    pub conflict_policy: ConflictPolicy,
    /// Whether directory sources are allowed.
    pub directory_paste: DirectoryPaste,
}

impl From<&ExplorerConfig> for TransferOptions {
    fn from(config: &ExplorerConfig) -> Self {
        Self {
            conflict_policy: config.conflict_policy,
            directory_paste: config.directory_paste,
        }
    }
}

/// Copy or move `source` into `destination_dir`, keeping its name.
///
/// The target is `destination_dir / source.name`. An occupied target is
/// handled by the conflict policy. Pasting a source onto itself never
/// overwrites it: a copy lands under an auto-renamed sibling and a move is a
/// no-op. A target that is the source's own ancestor, or a directory's own
/// subtree, is refused before anything is touched.
pub fn transfer(
    source: &Path,
    destination_dir: &Path,
    kind: TransferKind,
    options: &TransferOptions,
) -> Result<OperationReport> {
    let name = source.file_name().ok_or_else(|| ExplorerError::TransferFailed {
        from: source.to_path_buf(),
        to: destination_dir.to_path_buf(),
        reason: "source has no file name".into(),
    })?;
    let target = destination_dir.join(name);
    let fail = |reason: &str| ExplorerError::TransferFailed {
        from: source.to_path_buf(),
        to: target.clone(),
        reason: reason.to_string(),
    };

    fs::symlink_metadata(source).map_err(|e| ExplorerError::transfer(source, &target, &e))?;
    let is_dir = source.is_dir();

    if !destination_dir.is_dir() {
        return Err(fail("destination is not a directory"));
    }
    if is_dir && options.directory_paste == DirectoryPaste::Reject {
        return Err(fail("directory paste is disabled"));
    }

    let resolution = if is_same_node(source, &target) {
        match kind {
            TransferKind::Move => {
                debug!(path = %source.display(), "move onto itself, nothing to do");
                return Ok(OperationReport::new(OperationType::Move, source).with_destination(&target));
            }
            TransferKind::Copy => Resolution::Renamed(auto_rename_path(&target)),
        }
    } else if is_dir && is_within(&target, source) {
        return Err(fail("cannot paste a directory into itself"));
    } else if is_within(source, &target) {
        return Err(fail("target contains the source"));
    } else {
        resolve_collision(target.clone(), options.conflict_policy)?
    };

    let final_path = resolution.path().to_path_buf();
    let (items, bytes) = if resolution.replaces() {
        replace_with(source, &final_path, kind, is_dir)?
    } else {
        place(source, &final_path, kind, is_dir)?
    };

    info!(
        kind = %kind,
        from = %source.display(),
        to = %final_path.display(),
        bytes,
        "transfer complete"
    );

    Ok(OperationReport::new(kind.operation_type(), source)
        .with_destination(final_path)
        .with_counts(items, bytes))
}

/// Whether `target` already is `source` (same path or same node via links).
fn is_same_node(source: &Path, target: &Path) -> bool {
    if source == target {
        return true;
    }
    match (fs::canonicalize(source), fs::canonicalize(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Whether `path` is `ancestor` or lies below it, lexically or once links
/// are resolved.
fn is_within(path: &Path, ancestor: &Path) -> bool {
    if path.starts_with(ancestor) {
        return true;
    }
    match (fs::canonicalize(path), fs::canonicalize(ancestor)) {
        (Ok(path), Ok(ancestor)) => path.starts_with(ancestor),
        _ => false,
    }
}

/// Copy or move `source` to a free path.
fn place(source: &Path, dest: &Path, kind: TransferKind, is_dir: bool) -> Result<(usize, u64)> {
    match kind {
        TransferKind::Copy => {
            copy_item(source, dest, is_dir).map_err(|e| ExplorerError::transfer(source, dest, &e))
        }
        TransferKind::Move => move_item(source, dest, is_dir),
    }
}

/// Replace the entry at `target` with `source`.
///
/// The payload is first placed at a hidden sibling; the occupant is only
/// removed once that succeeded, then the sibling is renamed into place. A
/// failed copy leaves the occupant untouched.
fn replace_with(source: &Path, target: &Path, kind: TransferKind, is_dir: bool) -> Result<(usize, u64)> {
    let staging = staging_path(target);
    debug!(target = %target.display(), staging = %staging.display(), "replacing existing entry");

    let (counts, leftover) = match place(source, &staging, kind, is_dir) {
        Ok(counts) => (counts, None),
        // The copy landed; finish the replacement and report the leftover source.
        Err(ExplorerError::MoveIncomplete { reason, .. }) => ((0, 0), Some(reason)),
        Err(e) => {
            if let Err(cleanup) = remove_any(&staging) {
                debug!(staging = %staging.display(), error = %cleanup, "nothing staged to clean up");
            }
            return Err(e);
        }
    };

    clear_target(target, is_dir)
        .and_then(|()| fs::rename(&staging, target))
        .map_err(|e| ExplorerError::TransferFailed {
            from: source.to_path_buf(),
            to: target.to_path_buf(),
            reason: format!("{}; payload kept at {}", describe_io(&e), staging.display()),
        })?;

    match leftover {
        Some(reason) => Err(ExplorerError::MoveIncomplete {
            from: source.to_path_buf(),
            to: target.to_path_buf(),
            reason,
        }),
        None => Ok(counts),
    }
}

/// Hidden, unused sibling of `target` to stage a replacement in.
fn staging_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(target.file_name().unwrap_or_default());
    name.push(".partial");

    let candidate = target.with_file_name(name);
    if fs::symlink_metadata(&candidate).is_ok() {
        auto_rename_path(&candidate)
    } else {
        candidate
    }
}

/// Remove what `fs::rename` cannot replace: directories, and anything a
/// directory is about to take the place of.
fn clear_target(target: &Path, source_is_dir: bool) -> io::Result<()> {
    let metadata = fs::symlink_metadata(target)?;
    if metadata.is_dir() {
        fs::remove_dir_all(target)
    } else if source_is_dir {
        fs::remove_file(target)
    } else {
        Ok(())
    }
}

fn remove_any(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Copy a file or directory tree, returning (nodes, bytes).
fn copy_item(source: &Path, dest: &Path, is_dir: bool) -> io::Result<(usize, u64)> {
    if is_dir {
        copy_dir_recursive(source, dest)
    } else {
        Ok((1, fs::copy(source, dest)?))
    }
}

/// Move with an atomic rename, falling back to copy + delete.
fn move_item(source: &Path, dest: &Path, is_dir: bool) -> Result<(usize, u64)> {
    let bytes = if is_dir {
        0
    } else {
        fs::metadata(source).map(|m| m.len()).unwrap_or(0)
    };

    match fs::rename(source, dest) {
        Ok(()) => return Ok((1, bytes)),
        Err(e) => debug!(error = %e, "rename failed, falling back to copy and delete"),
    }

    let counts = copy_item(source, dest, is_dir).map_err(|e| ExplorerError::transfer(source, dest, &e))?;

    let removed = if is_dir {
        fs::remove_dir_all(source)
    } else {
        fs::remove_file(source)
    };
    removed.map_err(|e| ExplorerError::MoveIncomplete {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        reason: describe_io(&e),
    })?;

    Ok(counts)
}

/// Recursively copy a directory.
///
/// Symlinks are recreated rather than followed on unix.
fn copy_dir_recursive(source: &Path, dest: &Path) -> io::Result<(usize, u64)> {
    fs::create_dir(dest)?;

    let mut items = 1;
    let mut bytes = 0u64;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let path = entry.path();
        let dest_path: PathBuf = dest.join(entry.file_name());
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            let (i, b) = copy_dir_recursive(&path, &dest_path)?;
            items += i;
            bytes += b;
        } else if file_type.is_symlink() {
            copy_symlink(&path, &dest_path)?;
            items += 1;
        } else {
            bytes += fs::copy(&path, &dest_path)?;
            items += 1;
        }
    }

    Ok((items, bytes))
}

#[cfg(unix)]
fn copy_symlink(link: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(link)?, dest)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(link, dest).map(|_| ())
}
