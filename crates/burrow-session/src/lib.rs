//! Browsing session for burrow.
//!
//! An [`ExplorerSession`] owns everything a single browsing session mutates:
//! the current location and its history, the selection set, and the
//! single-slot clipboard. Each piece is also usable on its own:
//!
//! - [`Navigator`] resolves enter / go-up / switch-scope requests.
//! - [`RootResolver`] picks the root directory for a [`Scope`].
//! - [`Selection`] tracks marked entries and broadcasts Idle/Active changes.
//! - [`Clipboard`] holds one staged copy or move until it is pasted.
//!
//! [`Scope`]: burrow_core::Scope

mod clipboard;
mod navigator;
mod roots;
mod selection;
mod session;

pub use clipboard::{Clipboard, StagedTransfer};
pub use navigator::{Listing, Navigator};
pub use roots::{HostStorage, RootResolver, ScopeClassifier, StorageProvider};
pub use selection::{Selection, SelectionChanged, SelectionState, SELECTION_CHANNEL_SIZE};
pub use session::ExplorerSession;
