//! Explorer configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::scope::Scope;

/// What paste does when the target name is already taken.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Replace the existing entry without asking (last writer wins).
    #[default]
    Overwrite,
    /// Keep both by pasting under "name (1).ext".
    AutoRename,
    /// Refuse the paste with `AlreadyExists`.
    Reject,
}

/// How paste treats a directory source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DirectoryPaste {
    /// Copy the whole subtree.
    #[default]
    Recurse,
    /// Only single files can be pasted.
    Reject,
}

/// Configuration for an explorer session.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ExplorerConfig {
    /// Path prefixes that mark a location as external storage.
    #[builder(default = "default_external_prefixes()")]
    #[serde(default = "default_external_prefixes")]
    pub external_prefixes: Vec<PathBuf>,

    /// Include hidden (dot) entries in listings.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub show_hidden: bool,

    /// Collision handling for paste.
    #[builder(default)]
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,

    /// Directory handling for paste.
    #[builder(default)]
    #[serde(default)]
    pub directory_paste: DirectoryPaste,

    /// Send deleted entries to the system trash instead of unlinking them.
    #[builder(default = "false")]
    #[serde(default)]
    pub use_trash: bool,

    /// Scope shown when a session starts without an explicit path.
    #[builder(default)]
    #[serde(default)]
    pub initial_scope: Scope,
}

fn default_true() -> bool {
    true
}

fn default_external_prefixes() -> Vec<PathBuf> {
    vec![PathBuf::from("/storage"), PathBuf::from("/sdcard")]
}

impl ExplorerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref prefixes) = self.external_prefixes {
            if let Some(bad) = prefixes.iter().find(|p| !p.is_absolute()) {
                return Err(format!(
                    "External prefix must be absolute: {}",
                    bad.display()
                ));
            }
        }
        Ok(())
    }
}

impl ExplorerConfig {
    /// Create a new config builder.
    pub fn builder() -> ExplorerConfigBuilder {
        ExplorerConfigBuilder::default()
    }

    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            external_prefixes: default_external_prefixes(),
            show_hidden: true,
            conflict_policy: ConflictPolicy::default(),
            directory_paste: DirectoryPaste::default(),
            use_trash: false,
            initial_scope: Scope::default(),
        }
    }
}
