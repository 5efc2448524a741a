//! Root directory policy and scope classification.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use burrow_core::{ExplorerConfig, Scope};
use tracing::{debug, warn};

/// Host facts the root policy depends on.
///
/// Implementations report what the platform allows; the policy itself lives
/// in [`RootResolver`].
pub trait StorageProvider {
    /// Whether the host grants access to the whole shared storage.
    fn has_unrestricted_access(&self) -> bool;

    /// Whether the host predates scoped storage.
    fn is_legacy_platform(&self) -> bool;

    /// Root of shared storage.
    fn storage_root(&self) -> io::Result<PathBuf>;

    /// Public directory usable without unrestricted access (downloads).
    fn public_directory(&self) -> io::Result<PathBuf>;

    /// Classic external root on legacy platforms.
    fn legacy_root(&self) -> io::Result<PathBuf>;

    /// Private application directory, the last-resort root.
    fn private_directory(&self) -> PathBuf;
}

/// Storage provider backed by the running host.
///
/// Uses the shared `/storage/emulated/0` tree when the host has one, and the
/// user's standard directories otherwise.
#[derive(Debug, Clone, Default)]
pub struct HostStorage;

const SHARED_STORAGE: &str = "/storage/emulated/0";

impl StorageProvider for HostStorage {
    fn has_unrestricted_access(&self) -> bool {
        self.storage_root()
            .and_then(fs::read_dir)
            .is_ok()
    }

    fn is_legacy_platform(&self) -> bool {
        false
    }

    fn storage_root(&self) -> io::Result<PathBuf> {
        let shared = Path::new(SHARED_STORAGE);
        if shared.is_dir() {
            return Ok(shared.to_path_buf());
        }
        dirs::home_dir().ok_or_else(|| not_found("home directory"))
    }

    fn public_directory(&self) -> io::Result<PathBuf> {
        dirs::download_dir().ok_or_else(|| not_found("download directory"))
    }

    fn legacy_root(&self) -> io::Result<PathBuf> {
        dirs::home_dir().ok_or_else(|| not_found("home directory"))
    }

    fn private_directory(&self) -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("burrow")
    }
}

fn not_found(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no {what} on this host"))
}

/// Picks the directory to present for a scope.
pub struct RootResolver {
    provider: Box<dyn StorageProvider>,
}

impl RootResolver {
    /// Create a resolver over a storage provider.
    pub fn new(provider: Box<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Resolve the root for `scope`.
    ///
    /// External storage is tried in order: the legacy external root on
    /// legacy platforms, otherwise the true storage root with unrestricted
    /// access, otherwise the public directory. Any failure, or a candidate
    /// that is not an existing directory, falls back to the private
    /// directory. Always returns an existing directory.
    pub fn root_for(&self, scope: Scope) -> PathBuf {
        match scope {
            Scope::Internal => self.private_root(),
            Scope::External => self.external_root(),
        }
    }

    /// Build the classifier matching this resolver's roots.
    ///
    /// The resolved external root counts as external in addition to the
    /// configured prefixes, unless it fell back to private storage.
    pub fn classifier(&self, config: &ExplorerConfig) -> ScopeClassifier {
        let private_dir = self.private_root();
        let mut external_prefixes = config.external_prefixes.clone();

        let external_root = self.external_root();
        if external_root != private_dir && !external_prefixes.contains(&external_root) {
            external_prefixes.push(external_root);
        }

        ScopeClassifier {
            private_dir: Some(private_dir),
            external_prefixes,
        }
    }

    fn external_root(&self) -> PathBuf {
        let candidate = if self.provider.is_legacy_platform() {
            self.provider.legacy_root()
        } else if self.provider.has_unrestricted_access() {
            self.provider.storage_root()
        } else {
            self.provider.public_directory()
        };

        match candidate {
            Ok(path) if path.is_dir() => {
                debug!(root = %path.display(), "resolved external root");
                path
            }
            Ok(path) => {
                warn!(root = %path.display(), "external root is not a directory, using private storage");
                self.private_root()
            }
            Err(e) => {
                warn!(error = %e, "cannot resolve external root, using private storage");
                self.private_root()
            }
        }
    }

    fn private_root(&self) -> PathBuf {
        let dir = self.provider.private_directory();
        match fs::create_dir_all(&dir) {
            Ok(()) => dir,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot create private directory");
                std::env::temp_dir()
            }
        }
    }
}

impl Default for RootResolver {
    fn default() -> Self {
        Self::new(Box::new(HostStorage))
    }
}

impl std::fmt::Debug for RootResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootResolver").finish_non_exhaustive()
    }
}

/// Path-prefix scope test bound to concrete directories.
#[derive(Debug, Clone, Default)]
pub struct ScopeClassifier {
    /// Private application directory; always internal.
    pub private_dir: Option<PathBuf>,
    /// Prefixes marking external storage.
    pub external_prefixes: Vec<PathBuf>,
}

impl ScopeClassifier {
    /// Classify `path`.
    pub fn classify(&self, path: &Path) -> Scope {
        Scope::classify(path, self.private_dir.as_deref(), &self.external_prefixes)
    }
}
