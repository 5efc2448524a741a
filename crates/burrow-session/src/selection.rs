//! Multi-entry selection with Idle/Active notifications.

use std::path::{Path, PathBuf};

use burrow_core::Entry;
use indexmap::IndexMap;
use tokio::sync::broadcast;
use tracing::debug;

/// Buffer size for selection change notifications.
pub const SELECTION_CHANNEL_SIZE: usize = 16;

/// Whether selection mode is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// One or more entries selected.
    Active,
}

/// Sent once per Idle/Active crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChanged {
    /// The new state.
    pub state: SelectionState,
}

impl SelectionChanged {
    /// Whether selection mode is now on.
    pub fn is_active(&self) -> bool {
        self.state == SelectionState::Active
    }
}

/// The set of selected entries, in the order they were selected.
///
/// Membership changes inside a state are silent; subscribers only hear about
/// transitions between Idle and Active.
#[derive(Debug)]
pub struct Selection {
    entries: IndexMap<PathBuf, Entry>,
    events: broadcast::Sender<SelectionChanged>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(SELECTION_CHANNEL_SIZE);
        Self {
            entries: IndexMap::new(),
            events,
        }
    }

    /// Subscribe to Idle/Active transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<SelectionChanged> {
        self.events.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> SelectionState {
        if self.entries.is_empty() {
            SelectionState::Idle
        } else {
            SelectionState::Active
        }
    }

    /// Whether selection mode is on.
    pub fn is_active(&self) -> bool {
        self.state() == SelectionState::Active
    }

    /// Number of selected entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if `path` is selected.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Flip membership of `entry`. Returns whether it is now selected.
    pub fn toggle(&mut self, entry: Entry) -> bool {
        let before = self.state();
        let selected = if self.entries.shift_remove(&entry.path).is_some() {
            false
        } else {
            self.entries.insert(entry.path.clone(), entry);
            true
        };
        self.notify_if_crossed(before);
        selected
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        let before = self.state();
        self.entries.clear();
        self.notify_if_crossed(before);
    }

    /// Keep only entries whose path satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&Path) -> bool) {
        let before = self.state();
        self.entries.retain(|path, _| keep(path));
        self.notify_if_crossed(before);
    }

    /// Selected entries in selection order.
    pub fn selected_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// The earliest selected entry, used as the target of single-entry
    /// operations.
    pub fn primary(&self) -> Option<&Entry> {
        self.entries.first().map(|(_, entry)| entry)
    }

    fn notify_if_crossed(&self, before: SelectionState) {
        let state = self.state();
        if state != before {
            debug!(?state, count = self.len(), "selection mode changed");
            // No subscribers is fine.
            let _ = self.events.send(SelectionChanged { state });
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}
