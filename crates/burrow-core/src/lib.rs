//! Core types for burrow.
//!
//! This crate provides the data model shared by the listing, transfer and
//! session crates: directory entries, storage scopes, engine configuration
//! and the error taxonomy every operation reports through.

mod config;
mod entry;
mod error;
mod paths;
mod scope;

pub use config::{ConflictPolicy, DirectoryPaste, ExplorerConfig, ExplorerConfigBuilder};
pub use entry::{Entry, compare_entries};
pub use error::{ExplorerError, Result, describe_io};
pub use paths::normalize;
pub use scope::Scope;
