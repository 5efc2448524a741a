//! The caller-facing explorer session.

use std::path::{Path, PathBuf};

use burrow_core::{Entry, ExplorerConfig, ExplorerError, Result, Scope, normalize};
use burrow_ops::{
    DeleteOptions, ListOptions, OperationReport, TransferKind, TransferOptions, create_directory,
    delete, rename,
};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::clipboard::{Clipboard, StagedTransfer};
use crate::navigator::{Listing, Navigator};
use crate::roots::{HostStorage, RootResolver, StorageProvider};
use crate::selection::{Selection, SelectionChanged};

/// One browsing session: location, history, selection and clipboard.
///
/// Entry arguments may be absolute or relative to the current location, and
/// must name an entry of the latest listing. Operations that change the
/// directory contents re-list it before returning, and the selection is
/// pruned to whatever that listing still contains.
#[derive(Debug)]
pub struct ExplorerSession {
    config: ExplorerConfig,
    resolver: RootResolver,
    navigator: Navigator,
    selection: Selection,
    clipboard: Clipboard,
    listing: Listing,
}

impl ExplorerSession {
    /// Open a session on the running host.
    ///
    /// Starts at `start` when given, otherwise at the root of the configured
    /// initial scope.
    pub fn open(config: ExplorerConfig, start: Option<&Path>) -> Result<Self> {
        Self::with_provider(config, Box::new(HostStorage), start)
    }

    /// Open a session over a custom storage provider.
    pub fn with_provider(
        config: ExplorerConfig,
        provider: Box<dyn StorageProvider>,
        start: Option<&Path>,
    ) -> Result<Self> {
        let resolver = RootResolver::new(provider);
        let mut navigator = Navigator::new(ListOptions::from(&config), resolver.classifier(&config));

        let start = match start {
            Some(path) => path.to_path_buf(),
            None => resolver.root_for(config.initial_scope),
        };
        let listing = navigator.enter(&start)?;
        info!(location = %listing.location.display(), scope = %listing.scope, "session opened");

        Ok(Self {
            config,
            resolver,
            navigator,
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            listing,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// The directory currently displayed.
    pub fn location(&self) -> &Path {
        &self.listing.location
    }

    /// Scope of the current location.
    pub fn current_scope(&self) -> Scope {
        self.listing.scope
    }

    /// Entries of the latest listing.
    pub fn entries(&self) -> &[Entry] {
        &self.listing.entries
    }

    /// Previously visited locations, oldest first.
    pub fn history(&self) -> &[PathBuf] {
        self.navigator.history()
    }

    /// Root directory that [`switch_scope`](Self::switch_scope) would enter.
    pub fn root_for(&self, scope: Scope) -> PathBuf {
        self.resolver.root_for(scope)
    }

    // Navigation

    /// List the current location afresh.
    pub fn list_current(&mut self) -> Result<Listing> {
        match self.navigator.refresh() {
            Ok(listing) => {
                self.adopt(listing.clone());
                Ok(listing)
            }
            Err(e) => {
                self.forget_listing(&e);
                Err(e)
            }
        }
    }

    /// Enter a directory.
    pub fn navigate_into(&mut self, path: &Path) -> Result<Listing> {
        let target = self.resolve(path);
        let listing = self.navigator.enter(&target)?;
        self.adopt(listing.clone());
        Ok(listing)
    }

    /// Go up one level, or back through history when the parent is gone.
    pub fn navigate_up(&mut self) -> Result<Listing> {
        let listing = self.navigator.go_up()?;
        self.adopt(listing.clone());
        Ok(listing)
    }

    /// Jump to the root of `scope`, clearing history.
    pub fn switch_scope(&mut self, scope: Scope) -> Result<Listing> {
        let root = self.resolver.root_for(scope);
        let listing = self.navigator.switch_scope(&root)?;
        self.adopt(listing.clone());
        Ok(listing)
    }

    /// Jump to the root of the scope the current location is not in.
    pub fn toggle_scope(&mut self) -> Result<Listing> {
        self.switch_scope(self.listing.scope.other())
    }

    // Selection

    /// Flip selection of an entry. Returns whether it is now selected.
    pub fn toggle_select(&mut self, path: &Path) -> Result<bool> {
        let entry = self.find(path)?.clone();
        Ok(self.selection.toggle(entry))
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Subscribe to selection mode changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SelectionChanged> {
        self.selection.subscribe()
    }

    /// Whether any entry is selected.
    pub fn is_selection_active(&self) -> bool {
        self.selection.is_active()
    }

    /// Selected entries in selection order.
    pub fn selected_entries(&self) -> Vec<&Entry> {
        self.selection.selected_entries().collect()
    }

    /// The underlying selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // Clipboard

    /// Stage an entry for copying.
    pub fn stage_copy(&mut self, path: &Path) -> Result<&StagedTransfer> {
        self.stage_entry(path, TransferKind::Copy)
    }

    /// Stage an entry for moving.
    pub fn stage_move(&mut self, path: &Path) -> Result<&StagedTransfer> {
        self.stage_entry(path, TransferKind::Move)
    }

    /// Stage the primary selected entry.
    pub fn stage_selected(&mut self, kind: TransferKind) -> Result<&StagedTransfer> {
        self.clipboard.stage(self.selection.primary(), kind)
    }

    /// The pending transfer, if any.
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Paste the staged transfer into the current location.
    ///
    /// The location is re-listed whether or not the paste succeeded.
    pub fn paste(&mut self) -> Result<OperationReport> {
        let options = TransferOptions::from(&self.config);
        let destination = self.listing.location.clone();

        let result = self.clipboard.paste(&destination, &options);
        if let Ok(report) = &result {
            info!("{}", report.summary());
        }
        self.relist();
        result
    }

    // Mutations

    /// Create a directory named `name` in the current location.
    pub fn create_directory(&mut self, name: &str) -> Result<OperationReport> {
        let report = create_directory(&self.listing.location, name)?;
        info!("{}", report.summary());
        self.relist();
        Ok(report)
    }

    /// Rename an entry within its directory.
    pub fn rename(&mut self, path: &Path, new_name: &str) -> Result<OperationReport> {
        let target = self.find(path)?.path.clone();
        let report = rename(&target, new_name)?;
        info!("{}", report.summary());
        self.relist();
        Ok(report)
    }

    /// Rename the primary selected entry.
    pub fn rename_selected(&mut self, new_name: &str) -> Result<OperationReport> {
        let target = self.primary_path()?;
        self.rename(&target, new_name)
    }

    /// Delete an entry, recursively for directories.
    ///
    /// The location is re-listed even when deletion stopped short.
    pub fn delete(&mut self, path: &Path) -> Result<OperationReport> {
        let target = self.find(path)?.path.clone();

        let result = delete(&target, &DeleteOptions::from(&self.config));
        if let Ok(report) = &result {
            info!("{}", report.summary());
        }
        self.relist();
        result
    }

    /// Delete the primary selected entry.
    pub fn delete_selected(&mut self) -> Result<OperationReport> {
        let target = self.primary_path()?;
        self.delete(&target)
    }

    fn stage_entry(&mut self, path: &Path, kind: TransferKind) -> Result<&StagedTransfer> {
        let resolved = self.resolve(path);
        let target = lookup(&self.listing.entries, &resolved);
        self.clipboard.stage(target, kind)
    }

    fn primary_path(&self) -> Result<PathBuf> {
        self.selection
            .primary()
            .map(|entry| entry.path.clone())
            .ok_or(ExplorerError::NoSelection)
    }

    fn find(&self, path: &Path) -> Result<&Entry> {
        let resolved = self.resolve(path);
        lookup(&self.listing.entries, &resolved).ok_or(ExplorerError::NoSelection)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        let joined = self.listing.location.join(path);
        normalize(&joined).unwrap_or(joined)
    }

    fn relist(&mut self) {
        match self.navigator.refresh() {
            Ok(listing) => self.adopt(listing),
            Err(e) => self.forget_listing(&e),
        }
    }

    fn adopt(&mut self, listing: Listing) {
        let entries = &listing.entries;
        self.selection
            .retain(|path| entries.iter().any(|entry| entry.path == path));
        self.listing = listing;
    }

    fn forget_listing(&mut self, error: &ExplorerError) {
        warn!(location = %self.listing.location.display(), %error, "current location is no longer listable");
        self.listing.entries.clear();
        self.selection.clear();
    }
}

fn lookup<'a>(entries: &'a [Entry], path: &Path) -> Option<&'a Entry> {
    entries.iter().find(|entry| entry.path == path)
}
