//! Location and history management.

use std::fs;
use std::path::{Path, PathBuf};

use burrow_core::{Entry, ExplorerError, Result, Scope, normalize};
use burrow_ops::{ListOptions, list_directory};
use serde::Serialize;
use tracing::debug;

use crate::roots::ScopeClassifier;

/// A fresh listing of the current location.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    /// The directory that was listed.
    pub location: PathBuf,
    /// Its entries, directories first.
    pub entries: Vec<Entry>,
    /// Scope of the location, for labelling the scope toggle.
    pub scope: Scope,
}

/// Owns the current location and the history stack.
///
/// The real parent directory is authoritative for going up; history is only
/// consulted when the parent is missing or unreadable.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: Option<PathBuf>,
    history: Vec<PathBuf>,
    options: ListOptions,
    classifier: ScopeClassifier,
}

impl Navigator {
    /// Create a navigator with no location yet.
    pub fn new(options: ListOptions, classifier: ScopeClassifier) -> Self {
        Self {
            current: None,
            history: Vec::new(),
            options,
            classifier,
        }
    }

    /// The current location, once one has been entered.
    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// Previously visited locations, oldest first.
    pub fn history(&self) -> &[PathBuf] {
        &self.history
    }

    /// Scope of an arbitrary path.
    pub fn scope_of(&self, path: &Path) -> Scope {
        self.classifier.classify(path)
    }

    /// Enter `dir`.
    ///
    /// The location only changes if listing succeeds. Moving to a different
    /// directory pushes the previous location onto the history.
    pub fn enter(&mut self, dir: &Path) -> Result<Listing> {
        let listing = self.list(dir)?;

        if let Some(previous) = self.current.take_if(|current| *current != listing.location) {
            self.history.push(previous);
        }
        self.current = Some(listing.location.clone());

        debug!(location = %listing.location.display(), depth = self.history.len(), "entered");
        Ok(listing)
    }

    /// Go up one level.
    ///
    /// Enters the real parent when it is a readable directory. Otherwise
    /// returns to the most recent history entry without pushing anything.
    /// With neither available, reports `NoParent` and changes nothing.
    pub fn go_up(&mut self) -> Result<Listing> {
        let current = self.current.clone().unwrap_or_default();

        if let Some(parent) = current.parent().filter(|parent| is_listable(parent)) {
            return self.enter(parent);
        }

        if let Some(previous) = self.history.last().cloned() {
            let listing = self.list(&previous)?;
            self.history.pop();
            self.current = Some(listing.location.clone());
            debug!(location = %listing.location.display(), "went back through history");
            return Ok(listing);
        }

        Err(ExplorerError::NoParent { path: current })
    }

    /// Jump to a scope root, forgetting the history.
    pub fn switch_scope(&mut self, root: &Path) -> Result<Listing> {
        let listing = self.list(root)?;
        self.history.clear();
        self.current = Some(listing.location.clone());
        debug!(root = %listing.location.display(), scope = %listing.scope, "switched scope");
        Ok(listing)
    }

    /// Re-list the current location without touching history.
    pub fn refresh(&self) -> Result<Listing> {
        match &self.current {
            Some(current) => self.list(current),
            None => Err(ExplorerError::ListFailure {
                path: PathBuf::new(),
                reason: "no location entered".into(),
            }),
        }
    }

    fn list(&self, dir: &Path) -> Result<Listing> {
        let location = normalize(dir).map_err(|e| ExplorerError::list(dir, &e))?;
        let entries = list_directory(&location, &self.options)?;
        Ok(Listing {
            scope: self.classifier.classify(&location),
            location,
            entries,
        })
    }
}

fn is_listable(dir: &Path) -> bool {
    dir.is_dir() && fs::read_dir(dir).is_ok()
}
