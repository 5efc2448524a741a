//! Reports for completed operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::Display;

/// The type of operation that was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum OperationType {
    Copy,
    Move,
    Delete,
    Rename,
    #[strum(to_string = "Create directory")]
    CreateDirectory,
}

/// Outcome of a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationReport {
    /// The type of operation.
    pub operation_type: OperationType,
    /// The path that was operated on.
    pub source: PathBuf,
    /// Where the result landed, for operations that produce a new path.
    pub destination: Option<PathBuf>,
    /// Number of filesystem nodes touched.
    pub items: usize,
    /// Bytes copied or freed.
    pub bytes_processed: u64,
}

impl OperationReport {
    /// Create a report with no counters set.
    pub fn new(operation_type: OperationType, source: impl Into<PathBuf>) -> Self {
        Self {
            operation_type,
            source: source.into(),
            destination: None,
            items: 1,
            bytes_processed: 0,
        }
    }

    /// Set the destination path.
    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Set the node and byte counters.
    pub fn with_counts(mut self, items: usize, bytes_processed: u64) -> Self {
        self.items = items;
        self.bytes_processed = bytes_processed;
        self
    }

    /// Get a human-readable summary of the operation.
    pub fn summary(&self) -> String {
        let action = match self.operation_type {
            OperationType::Copy => "Copied",
            OperationType::Move => "Moved",
            OperationType::Delete => "Deleted",
            OperationType::Rename => "Renamed",
            OperationType::CreateDirectory => "Created",
        };

        let name = |path: &PathBuf| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        };

        match &self.destination {
            Some(dest) if self.operation_type != OperationType::CreateDirectory => {
                format!("{} {} to {}", action, name(&self.source), dest.display())
            }
            _ if self.items > 1 => format!("{} {} ({} items)", action, name(&self.source), self.items),
            _ => format!("{} {}", action, name(&self.source)),
        }
    }
}
