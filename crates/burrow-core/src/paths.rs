//! Path normalization.

use std::io;
use std::path::{self, Component, Path, PathBuf};

/// Make `path` absolute and fold away `.` and `..` components.
///
/// Folding is lexical: symlinks are not resolved, so a location keeps the
/// name it was reached by. `..` at the root stays at the root.
pub fn normalize(path: &Path) -> io::Result<PathBuf> {
    let absolute = path::absolute(path)?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // pop() refuses to remove the root
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folds_parent_and_current() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")).unwrap(), PathBuf::from("/a/c/d"));
        assert_eq!(normalize(Path::new("/a/b/..")).unwrap(), PathBuf::from("/a"));
    }

    #[test]
    fn test_parent_of_root_is_root() {
        assert_eq!(normalize(Path::new("/..")).unwrap(), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("/storage/../..")).unwrap(), PathBuf::from("/"));
    }

    #[test]
    fn test_relative_becomes_absolute() {
        let normalized = normalize(Path::new("some/dir/..")).unwrap();
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("some"));
    }
}
