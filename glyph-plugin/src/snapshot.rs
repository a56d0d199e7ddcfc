//! Registry snapshot
//!
//! A data-only record of which module declared each item. Loading a
//! snapshot re-resolves every entry through the namespace, so a plugin that
//! has since disappeared makes the whole snapshot unusable.

use crate::{DiscoveryOptions, ItemDescriptor, Namespace, SnapshotLoadError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Bumped whenever the file layout changes
pub const SNAPSHOT_FORMAT: u32 = 2;

const GENERATOR: &str = concat!("glyph-plugin ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub name: String,
    pub module: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format: u32,
    pub generator: String,
    pub namespace: String,
    /// Settings the recorded discovery ran with
    pub options: DiscoveryOptions,
    pub items: Vec<SnapshotEntry>,
}

impl Snapshot {
    /// Record the name and module of every item in `items`
    pub fn capture(
        namespace: &str,
        options: &DiscoveryOptions,
        items: &BTreeMap<String, ItemDescriptor>,
    ) -> Self {
        Self {
            format: SNAPSHOT_FORMAT,
            generator: GENERATOR.to_string(),
            namespace: namespace.to_string(),
            options: *options,
            items: items
                .iter()
                .map(|(name, d)| SnapshotEntry {
                    name: name.clone(),
                    module: d.module().to_string(),
                })
                .collect(),
        }
    }

    /// Read and parse the snapshot at `path`, rejecting other versions.
    pub fn load(path: &Path) -> Result<Self, SnapshotLoadError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SnapshotLoadError::Missing(path.to_path_buf()));
            }
            Err(source) => {
                return Err(SnapshotLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let snapshot: Snapshot = serde_json::from_str(&raw).map_err(|source| SnapshotLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if snapshot.format != SNAPSHOT_FORMAT || snapshot.generator != GENERATOR {
            return Err(SnapshotLoadError::Version {
                found: format!("{} (format {})", snapshot.generator, snapshot.format),
                expected: format!("{} (format {})", GENERATOR, SNAPSHOT_FORMAT),
            });
        }
        Ok(snapshot)
    }

    /// Write to `path`, creating parent directories. The file is written
    /// beside the target and renamed over it.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "registry.json".to_string());
        let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }

    /// Turn entries back into descriptors through `namespace`. The snapshot
    /// only stands in for a discovery of the same root with the same options.
    pub fn resolve(
        &self,
        namespace: &dyn Namespace,
        root: &str,
        options: &DiscoveryOptions,
    ) -> Result<BTreeMap<String, ItemDescriptor>, SnapshotLoadError> {
        if self.namespace != root {
            return Err(SnapshotLoadError::Namespace {
                found: self.namespace.clone(),
                expected: root.to_string(),
            });
        }
        if self.options != *options {
            return Err(SnapshotLoadError::Options {
                found: self.options,
                expected: *options,
            });
        }

        let mut modules: BTreeMap<&str, Vec<ItemDescriptor>> = BTreeMap::new();
        let mut items = BTreeMap::new();
        for entry in &self.items {
            let unresolved = || SnapshotLoadError::Unresolved {
                name: entry.name.clone(),
                module: entry.module.clone(),
            };
            if !modules.contains_key(entry.module.as_str()) {
                let declared = namespace.read_module(&entry.module).map_err(|_| unresolved())?;
                modules.insert(entry.module.as_str(), declared);
            }
            let descriptor = modules
                .get(entry.module.as_str())
                // last declaration wins, as in discovery
                .and_then(|declared| declared.iter().rfind(|d| d.name() == entry.name))
                .ok_or_else(unresolved)?;
            items.insert(entry.name.clone(), descriptor.clone());
        }
        Ok(items)
    }
}
