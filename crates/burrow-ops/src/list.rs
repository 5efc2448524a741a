//! Directory listing.

use std::fs;
use std::path::Path;

use burrow_core::{Entry, ExplorerConfig, ExplorerError, Result, compare_entries, normalize};
use tracing::{debug, warn};

/// Options for directory listings.
#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    /// Include entries whose name starts with a dot.
    pub show_hidden: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self { show_hidden: true }
    }
}

impl From<&ExplorerConfig> for ListOptions {
    fn from(config: &ExplorerConfig) -> Self {
        Self {
            show_hidden: config.show_hidden,
        }
    }
}

/// List `dir` as a sorted sequence of entries.
///
/// Directories come first, then names in case-insensitive order. A directory
/// that is missing, not a directory, or unreadable yields `ListFailure`.
/// Children that vanish or cannot be stat'ed while listing are skipped.
pub fn list_directory(dir: &Path, options: &ListOptions) -> Result<Vec<Entry>> {
    let dir = normalize(dir).map_err(|e| ExplorerError::list(dir, &e))?;
    let read = fs::read_dir(&dir).map_err(|e| ExplorerError::list(&dir, &e))?;

    let mut entries = Vec::new();
    for item in read {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if !options.show_hidden && item.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = item.path();
        // Follow symlinks; fall back to the link itself when dangling.
        match fs::metadata(&path).or_else(|_| item.metadata()) {
            Ok(metadata) => entries.push(Entry::from_metadata(path, &metadata)),
            Err(e) => warn!(path = %path.display(), error = %e, "entry vanished while listing"),
        }
    }

    entries.sort_by(compare_entries);
    debug!(dir = %dir.display(), count = entries.len(), "listed directory");

    Ok(entries)
}
