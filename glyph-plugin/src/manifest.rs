//! Plugin manifest
//!
//! Plugin crates add their item types to a `Manifest`, the same way every
//! item pack exposes a `load_*` function. The manifest arranges the
//! declaring module paths into a package tree and serves it to the
//! discoverer as a `Namespace`.

use crate::descriptor::module_of;
use crate::{DiscoveryError, ErrorItem, ItemDescriptor, ItemPlugin, ModuleEntry, Namespace};
use std::collections::BTreeMap;

/// Explicit list of item types, grouped by declaring module
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    modules: BTreeMap<String, Vec<ItemDescriptor>>,
}

impl Manifest {
    pub fn new() -> Self {
        Self {
            modules: BTreeMap::new(),
        }
    }

    /// Manifest holding the items this crate ships
    pub fn builtin() -> Self {
        Self::new().with_item::<ErrorItem>()
    }

    /// Add `T`, declared in the module its type path names
    pub fn with_item<T: ItemPlugin>(self) -> Self {
        let module = module_of::<T>();
        self.with_item_in::<T>(module)
    }

    /// Add `T` under an explicit module path
    pub fn with_item_in<T: ItemPlugin>(self, module: &str) -> Self {
        self.with_descriptor(ItemDescriptor::of::<T>(module))
    }

    pub fn with_descriptor(mut self, descriptor: ItemDescriptor) -> Self {
        self.modules
            .entry(descriptor.module().to_string())
            .or_default()
            .push(descriptor);
        self
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ItemDescriptor> {
        self.modules.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Paths strictly below `package`, relative to it
    fn below<'a>(&'a self, package: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.modules.keys().filter_map(move |path| {
            if package.is_empty() {
                Some(path.as_str())
            } else {
                path.strip_prefix(package)
                    .and_then(|rest| rest.strip_prefix("::"))
            }
        })
    }
}

fn join(package: &str, child: &str) -> String {
    if package.is_empty() {
        child.to_string()
    } else {
        format!("{package}::{child}")
    }
}

impl Namespace for Manifest {
    fn iter_modules(&self, package: &str) -> Result<Vec<ModuleEntry>, DiscoveryError> {
        let mut children: BTreeMap<String, (bool, bool)> = BTreeMap::new();
        for rest in self.below(package) {
            let (head, deeper) = match rest.split_once("::") {
                Some((head, _)) => (head, true),
                None => (rest, false),
            };
            let flags = children.entry(join(package, head)).or_default();
            if deeper {
                flags.1 = true;
            } else {
                flags.0 = true;
            }
        }

        if children.is_empty() && !package.is_empty() && !self.modules.contains_key(package) {
            return Err(DiscoveryError::PackageNotFound(package.to_string()));
        }

        let mut entries = Vec::new();
        for (path, (is_module, is_package)) in children {
            if is_module {
                entries.push(ModuleEntry::module(path.clone()));
            }
            if is_package {
                entries.push(ModuleEntry::package(path));
            }
        }
        Ok(entries)
    }

    fn read_module(&self, module: &str) -> Result<Vec<ItemDescriptor>, DiscoveryError> {
        self.modules
            .get(module)
            .cloned()
            .ok_or_else(|| DiscoveryError::ModuleNotFound(module.to_string()))
    }
}
