//! Single-slot clipboard for staged copy and move.

use std::path::Path;

use burrow_core::{Entry, ExplorerError, Result};
use burrow_ops::{OperationReport, TransferKind, TransferOptions, transfer};
use tracing::{debug, warn};

/// A pending copy or move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTransfer {
    /// Snapshot of the entry to transfer.
    pub source: Entry,
    /// Whether the source is kept or removed.
    pub kind: TransferKind,
}

/// Holds at most one staged transfer.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slot: Option<StagedTransfer>,
}

impl Clipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `target` for a later paste, replacing whatever was staged.
    ///
    /// Fails with `NoSelection` when there is no target.
    pub fn stage(&mut self, target: Option<&Entry>, kind: TransferKind) -> Result<&StagedTransfer> {
        let source = target.ok_or(ExplorerError::NoSelection)?.clone();
        debug!(path = %source.path.display(), %kind, "staged");
        Ok(&*self.slot.insert(StagedTransfer { source, kind }))
    }

    /// The staged transfer, if any.
    pub fn staged(&self) -> Option<&StagedTransfer> {
        self.slot.as_ref()
    }

    /// Check if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Drop the staged transfer.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Execute the staged transfer into `destination`.
    ///
    /// The slot is emptied only on success, so a failed paste can be retried.
    pub fn paste(&mut self, destination: &Path, options: &TransferOptions) -> Result<OperationReport> {
        let staged = self.slot.as_ref().ok_or(ExplorerError::NoClipboard)?;

        match transfer(&staged.source.path, destination, staged.kind, options) {
            Ok(report) => {
                self.slot = None;
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "paste failed, keeping clipboard");
                Err(e)
            }
        }
    }
}
