//! Name collision handling for paste.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use burrow_core::{ConflictPolicy, ExplorerError, Result};

/// Where a pasted item ends up once collisions are settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing occupies the target name.
    Free(PathBuf),
    /// Something occupies the target and will be replaced.
    Replace(PathBuf),
    /// The item is pasted under a fresh name next to the occupant.
    Renamed(PathBuf),
}

impl Resolution {
    /// Final path of the pasted item.
    pub fn path(&self) -> &Path {
        match self {
            Self::Free(path) | Self::Replace(path) | Self::Renamed(path) => path,
        }
    }

    /// Whether an existing entry has to be cleared first.
    pub fn replaces(&self) -> bool {
        matches!(self, Self::Replace(_))
    }
}

/// Settle a paste target according to `policy`.
///
/// Existence is checked without following symlinks, so a dangling link still
/// counts as an occupant.
pub fn resolve_collision(target: PathBuf, policy: ConflictPolicy) -> Result<Resolution> {
    if fs::symlink_metadata(&target).is_err() {
        return Ok(Resolution::Free(target));
    }

    match policy {
        ConflictPolicy::Overwrite => Ok(Resolution::Replace(target)),
        ConflictPolicy::AutoRename => Ok(Resolution::Renamed(auto_rename_path(&target))),
        ConflictPolicy::Reject => Err(ExplorerError::AlreadyExists { path: target }),
    }
}

/// First free sibling of `path` named "stem (n).ext".
///
/// Names are built on the raw OS string, so stems that are not valid UTF-8
/// survive unchanged. Only the last extension is kept apart:
/// "archive.tar.gz" becomes "archive.tar (1).gz".
pub fn auto_rename_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    let extension = path.extension();

    let mut n: u64 = 1;
    loop {
        let mut name = OsString::from(stem);
        name.push(format!(" ({n})"));
        if let Some(extension) = extension {
            name.push(".");
            name.push(extension);
        }

        let candidate = path.with_file_name(name);
        if fs::symlink_metadata(&candidate).is_err() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_auto_rename_path() {
        let path = PathBuf::from("/tmp/burrow-none/test.txt");
        let renamed = auto_rename_path(&path);
        assert!(renamed.to_string_lossy().ends_with("test (1).txt"));
    }

    #[test]
    fn test_auto_rename_no_extension() {
        let path = PathBuf::from("/tmp/burrow-none/testfile");
        let renamed = auto_rename_path(&path);
        assert!(renamed.to_string_lossy().ends_with("testfile (1)"));
    }

    #[test]
    fn test_auto_rename_keeps_inner_dots() {
        let renamed = auto_rename_path(Path::new("/tmp/burrow-none/archive.tar.gz"));
        assert_eq!(renamed, PathBuf::from("/tmp/burrow-none/archive.tar (1).gz"));
    }

    #[cfg(unix)]
    #[test]
    fn test_auto_rename_non_utf8_stem() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = Path::new("/tmp/burrow-none");
        let renamed = auto_rename_path(&dir.join(OsStr::from_bytes(b"caf\xe9.txt")));

        assert_eq!(renamed.file_name().unwrap().as_bytes(), b"caf\xe9 (1).txt");
    }

    #[test]
    fn test_auto_rename_skips_taken() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"").unwrap();
        fs::write(temp.path().join("a (1).txt"), b"").unwrap();

        let renamed = auto_rename_path(&temp.path().join("a.txt"));
        assert_eq!(renamed, temp.path().join("a (2).txt"));
    }

    #[test]
    fn test_resolve_by_policy() {
        let temp = TempDir::new().unwrap();
        let taken = temp.path().join("taken.txt");
        fs::write(&taken, b"").unwrap();
        let free = temp.path().join("free.txt");

        assert_eq!(
            resolve_collision(free.clone(), ConflictPolicy::Reject).unwrap(),
            Resolution::Free(free)
        );
        assert!(resolve_collision(taken.clone(), ConflictPolicy::Overwrite)
            .unwrap()
            .replaces());
        assert_eq!(
            resolve_collision(taken.clone(), ConflictPolicy::AutoRename)
                .unwrap()
                .path(),
            temp.path().join("taken (1).txt")
        );
        assert!(matches!(
            resolve_collision(taken, ConflictPolicy::Reject),
            Err(ExplorerError::AlreadyExists { .. })
        ));
    }
}
