//! Directory entry snapshots.

use std::cmp::Ordering;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A single filesystem node as seen by the explorer.
///
/// Entries are snapshots taken at list time. They go stale as soon as the
/// underlying filesystem changes and are never refreshed in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// File or directory name as reported by the filesystem.
    pub name: CompactString,

    /// Absolute path; the identity of the entry within a listing.
    pub path: PathBuf,

    /// Whether the entry resolves to a directory.
    pub is_directory: bool,

    /// Size in bytes. Always 0 for directories.
    pub size: u64,

    /// Last modification time.
    pub last_modified: SystemTime,
}

impl Entry {
    /// Build an entry from a path and its already-fetched metadata.
    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> Self {
        let path = path.into();
        let is_directory = metadata.is_dir();

        Self {
            name: entry_name(&path),
            size: if is_directory { 0 } else { metadata.len() },
            last_modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            is_directory,
            path,
        }
    }

    /// Take a fresh snapshot of the node at `path`.
    ///
    /// Symlinks are followed; a dangling link is described by its own
    /// metadata and therefore shows up as a file.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).or_else(|_| fs::symlink_metadata(path))?;
        Ok(Self::from_metadata(path, &metadata))
    }

    /// Directory containing this entry, if any.
    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Check if this is a regular (non-directory) entry.
    pub fn is_file(&self) -> bool {
        !self.is_directory
    }
}

/// Listing order: directories first, then case-insensitive name.
///
/// Names equal under case folding are ordered by their raw bytes so the
/// ordering stays total.
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    a.is_file()
        .cmp(&b.is_file())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

fn entry_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::from(name.to_string_lossy()),
        // Filesystem roots have no final component.
        None => CompactString::from(path.to_string_lossy()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_directory: bool) -> Entry {
        Entry {
            name: name.into(),
            path: PathBuf::from("/x").join(name),
            is_directory,
            size: 0,
            last_modified: SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_directories_sort_first() {
        let dir = entry("zeta", true);
        let file = entry("alpha.txt", false);
        assert_eq!(compare_entries(&dir, &file), Ordering::Less);
        assert_eq!(compare_entries(&file, &dir), Ordering::Greater);
    }

    #[test]
    fn test_case_insensitive_then_raw() {
        let upper = entry("Readme", false);
        let lower = entry("readme", false);
        let other = entry("apple", false);

        assert_eq!(compare_entries(&other, &upper), Ordering::Less);
        assert_eq!(compare_entries(&upper, &lower), Ordering::Less);
        assert_eq!(compare_entries(&lower, &upper), Ordering::Greater);
    }

    #[test]
    fn test_root_entry_name() {
        assert_eq!(entry_name(Path::new("/")), "/");
        assert_eq!(entry_name(Path::new("/tmp/a.txt")), "a.txt");
    }
}
