use crate::DiscoveryOptions;
use std::path::PathBuf;

use thiserror::Error;

/// Lookup of a name the registry does not contain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown item '{name}'")]
pub struct UnknownItemError {
    pub name: String,
}

impl UnknownItemError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Two modules declared the same item name under `DuplicatePolicy::Reject`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("item '{name}' is declared in both '{first}' and '{second}'")]
pub struct DuplicateItemError {
    pub name: String,
    pub first: String,
    pub second: String,
}

/// A package or module in the namespace could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("package '{0}' not found in namespace")]
    PackageNotFound(String),

    #[error("module '{0}' not found in namespace")]
    ModuleNotFound(String),

    #[error("failed to load '{module}': {reason}")]
    LoadFailed { module: String, reason: String },
}

impl DiscoveryError {
    pub fn load_failed(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            module: module.into(),
            reason: reason.into(),
        }
    }

    /// Path of the package or module that failed
    pub fn module(&self) -> &str {
        match self {
            Self::PackageNotFound(m) | Self::ModuleNotFound(m) => m,
            Self::LoadFailed { module, .. } => module,
        }
    }
}

/// The persisted registry snapshot could not be used
#[derive(Debug, Error)]
pub enum SnapshotLoadError {
    #[error("no snapshot at {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot was written by {found}, expected {expected}")]
    Version { found: String, expected: String },

    #[error("snapshot covers namespace '{found}', expected '{expected}'")]
    Namespace { found: String, expected: String },

    #[error("snapshot was discovered with {found:?}, expected {expected:?}")]
    Options {
        found: DiscoveryOptions,
        expected: DiscoveryOptions,
    },

    #[error("snapshot entry '{name}' in '{module}' no longer resolves")]
    Unresolved { name: String, module: String },
}

/// Building or rebuilding a registry failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Duplicate(#[from] DuplicateItemError),
}

/// Failure inside an item's `get`
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Unavailable(String),

    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ItemError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn external(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
