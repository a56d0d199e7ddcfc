//! Plugin discovery
//!
//! Walks a namespace of packages and modules and collects every declared
//! item type. Only declarations are read; nothing is constructed.

use crate::{DiscoveryError, DuplicateItemError, ItemDescriptor, RegistryError, ITEM_MARKER};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

/// Nested packages deeper than this are skipped
const MAX_DEPTH: usize = 32;

/// One child of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    /// Full `::`-separated path
    pub path: String,
    pub is_package: bool,
}

impl ModuleEntry {
    pub fn module(path: impl Into<String>) -> Self {
        Self { path: path.into(), is_package: false }
    }

    pub fn package(path: impl Into<String>) -> Self {
        Self { path: path.into(), is_package: true }
    }
}

/// A tree of plugin packages and modules
pub trait Namespace: Send + Sync {
    /// Immediate children of `package`. The empty path is the root.
    fn iter_modules(&self, package: &str) -> Result<Vec<ModuleEntry>, DiscoveryError>;

    /// Item types declared in `module`.
    fn read_module(&self, module: &str) -> Result<Vec<ItemDescriptor>, DiscoveryError>;
}

/// Which supertypes count as implementing the Item capability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inheritance {
    /// Only types declaring `ITEM_MARKER` as their supertype
    #[default]
    Direct,
    /// Also types whose chain of supertypes reaches `ITEM_MARKER`
    Transitive,
}

/// What happens when two modules declare the same item name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Later module in traversal order wins, with a warning
    #[default]
    LastWins,
    Reject,
}

/// What happens when a package or module cannot be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleErrors {
    /// Skip the unit with a warning
    #[default]
    Skip,
    Propagate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryOptions {
    pub inheritance: Inheritance,
    pub duplicates: DuplicatePolicy,
    pub module_errors: ModuleErrors,
}

impl DiscoveryOptions {
    /// Reference behavior: reject duplicates, propagate module errors
    pub fn strict() -> Self {
        Self {
            inheritance: Inheritance::Direct,
            duplicates: DuplicatePolicy::Reject,
            module_errors: ModuleErrors::Propagate,
        }
    }

    pub fn with_inheritance(mut self, inheritance: Inheritance) -> Self {
        self.inheritance = inheritance;
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_module_errors(mut self, module_errors: ModuleErrors) -> Self {
        self.module_errors = module_errors;
        self
    }
}

/// Scan `root` in `namespace` and map item names to descriptors.
pub fn discover(
    namespace: &dyn Namespace,
    root: &str,
    options: &DiscoveryOptions,
) -> Result<BTreeMap<String, ItemDescriptor>, RegistryError> {
    let span = tracing::debug_span!("discover", root = %root);
    let _guard = span.enter();

    let mut declared = Vec::new();
    walk(namespace, root, options, 0, &mut declared)?;

    let chains: HashMap<&str, &str> = declared
        .iter()
        .map(|d| (d.name(), d.extends()))
        .collect();

    let mut items: BTreeMap<String, ItemDescriptor> = BTreeMap::new();
    for descriptor in &declared {
        let included = match options.inheritance {
            Inheritance::Direct => descriptor.is_direct(),
            Inheritance::Transitive => reaches_marker(descriptor.name(), &chains),
        };
        if !included {
            debug!(item = descriptor.name(), extends = descriptor.extends(), "not an item, skipping");
            continue;
        }

        if let Some(previous) = items.get(descriptor.name()) {
            match options.duplicates {
                DuplicatePolicy::Reject => {
                    return Err(DuplicateItemError {
                        name: descriptor.name().to_string(),
                        first: previous.module().to_string(),
                        second: descriptor.module().to_string(),
                    }
                    .into());
                }
                DuplicatePolicy::LastWins => {
                    warn!(
                        item = descriptor.name(),
                        first = previous.module(),
                        second = descriptor.module(),
                        "duplicate item name, keeping the later declaration"
                    );
                }
            }
        }
        debug!(item = descriptor.name(), module = descriptor.module(), "adding item");
        items.insert(descriptor.name().to_string(), descriptor.clone());
    }

    debug!(count = items.len(), "discovery finished");
    Ok(items)
}

fn walk(
    namespace: &dyn Namespace,
    package: &str,
    options: &DiscoveryOptions,
    depth: usize,
    declared: &mut Vec<ItemDescriptor>,
) -> Result<(), DiscoveryError> {
    if depth > MAX_DEPTH {
        warn!(package = %package, "namespace nested too deeply, skipping");
        return Ok(());
    }
    debug!(package = %package, "looking for items");

    let entries = match namespace.iter_modules(package) {
        Ok(entries) => entries,
        Err(e) => return skip_or_propagate(e, options),
    };

    for entry in entries {
        if entry.is_package {
            walk(namespace, &entry.path, options, depth + 1, declared)?;
            continue;
        }
        match namespace.read_module(&entry.path) {
            Ok(types) => declared.extend(types),
            Err(e) => skip_or_propagate(e, options)?,
        }
    }
    Ok(())
}

fn skip_or_propagate(error: DiscoveryError, options: &DiscoveryOptions) -> Result<(), DiscoveryError> {
    match options.module_errors {
        ModuleErrors::Propagate => Err(error),
        ModuleErrors::Skip => {
            warn!(module = error.module(), error = %error, "skipping unreadable module");
            Ok(())
        }
    }
}

/// Follow `extends` links from `name` until the marker, a cycle, or a
/// type outside the namespace.
fn reaches_marker(name: &str, chains: &HashMap<&str, &str>) -> bool {
    let mut seen = HashSet::new();
    let mut current = name;
    while seen.insert(current) {
        match chains.get(current) {
            Some(&parent) if parent == ITEM_MARKER => return true,
            Some(&parent) => current = parent,
            None => return false,
        }
    }
    false
}
