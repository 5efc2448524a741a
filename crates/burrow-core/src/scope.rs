//! Storage scope classification.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether a location lives in private application storage or in shared
/// storage.
///
/// Scope is always derived from the path itself; it only drives root
/// selection and toggle labelling, never which operations are allowed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Private application storage.
    Internal,
    /// Shared, user-visible storage.
    #[default]
    External,
}

impl Scope {
    /// Classify a path by prefix.
    ///
    /// Anything under `private_dir` is internal even when it also matches an
    /// external prefix; otherwise a path is external when it starts with one
    /// of `external_prefixes`.
    pub fn classify(path: &Path, private_dir: Option<&Path>, external_prefixes: &[PathBuf]) -> Self {
        if private_dir.is_some_and(|dir| path.starts_with(dir)) {
            return Self::Internal;
        }
        if external_prefixes.iter().any(|prefix| path.starts_with(prefix)) {
            Self::External
        } else {
            Self::Internal
        }
    }

    /// The scope a toggle switches to.
    pub fn other(self) -> Self {
        match self {
            Self::Internal => Self::External,
            Self::External => Self::Internal,
        }
    }

    /// Label for the toggle action while this scope is displayed.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Internal => "Switch to external",
            Self::External => "Switch to internal",
        }
    }
}
