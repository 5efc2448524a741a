//! Listing and file operations engine for burrow.
//!
//! This crate provides the synchronous building blocks the session drives:
//! sorted directory listings, staged copy/move execution with collision
//! handling, and the create, rename and delete mutations. Every function
//! converts filesystem failures into [`burrow_core::ExplorerError`] at the
//! call site.

mod conflict;
mod create;
mod delete;
mod list;
mod rename;
mod report;
mod transfer;

pub use conflict::{Resolution, auto_rename_path, resolve_collision};
pub use create::create_directory;
pub use delete::{DeleteOptions, delete};
pub use list::{ListOptions, list_directory};
pub use rename::{rename, validate_filename};
pub use report::{OperationReport, OperationType};
pub use transfer::{TransferKind, TransferOptions, transfer};
