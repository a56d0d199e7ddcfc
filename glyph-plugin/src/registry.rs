//! Item Registry
//!
//! Maps item names to descriptors. A registry is loaded from its snapshot
//! when one is usable and built by fresh discovery otherwise; a fresh
//! build is written back to the cache file.

use crate::{
    discover, DiscoveryOptions, ItemDescriptor, Manifest, Namespace, RegistryError, Snapshot,
    UnknownItemError,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Where the current mapping came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrySource {
    Snapshot,
    Discovery,
}

/// Default snapshot location: `<cache dir>/glyph/registry.json`
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("glyph").join("registry.json"))
}

/// Central item registry
pub struct Registry {
    items: BTreeMap<String, ItemDescriptor>,
    source: RegistrySource,
    /// Set once `rebuild` has been attempted, whatever its outcome
    rediscovered: bool,
    namespace: Arc<dyn Namespace>,
    root: String,
    cache_path: Option<PathBuf>,
    options: DiscoveryOptions,
}

pub struct RegistryBuilder {
    namespace: Arc<dyn Namespace>,
    root: String,
    cache_path: Option<PathBuf>,
    options: DiscoveryOptions,
    use_snapshot: bool,
}

impl RegistryBuilder {
    fn new() -> Self {
        Self {
            namespace: Arc::new(Manifest::builtin()),
            root: String::new(),
            cache_path: None,
            options: DiscoveryOptions::default(),
            use_snapshot: true,
        }
    }

    pub fn namespace(mut self, namespace: impl Namespace + 'static) -> Self {
        self.namespace = Arc::new(namespace);
        self
    }

    pub fn shared_namespace(mut self, namespace: Arc<dyn Namespace>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Package to scan; the empty path scans the whole namespace
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Snapshot location; `None` disables persistence
    pub fn cache_path(mut self, path: Option<PathBuf>) -> Self {
        self.cache_path = path;
        self
    }

    pub fn options(mut self, options: DiscoveryOptions) -> Self {
        self.options = options;
        self
    }

    /// Ignore any existing snapshot and run discovery
    pub fn fresh(mut self) -> Self {
        self.use_snapshot = false;
        self
    }

    pub fn build(self) -> Result<Registry, RegistryError> {
        let span = tracing::debug_span!("registry", root = %self.root);
        let _guard = span.enter();

        let mut registry = Registry {
            items: BTreeMap::new(),
            source: RegistrySource::Discovery,
            rediscovered: false,
            namespace: self.namespace,
            root: self.root,
            cache_path: self.cache_path,
            options: self.options,
        };

        if self.use_snapshot {
            if let Some(items) = registry.load_snapshot() {
                registry.items = items;
                registry.source = RegistrySource::Snapshot;
                return Ok(registry);
            }
        }

        registry.rebuild()?;
        Ok(registry)
    }
}

impl Registry {
    /// Registry over the built-in manifest, cached at `cache_path`.
    ///
    /// Never fails: an unusable snapshot falls back to discovery, and a
    /// failed discovery leaves the registry empty.
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        let builder = Self::builder().cache_path(Some(cache_path.into()));
        let namespace = Arc::clone(&builder.namespace);
        match builder.build() {
            Ok(registry) => registry,
            Err(e) => {
                error!(error = %e, "item discovery failed");
                Registry {
                    items: BTreeMap::new(),
                    source: RegistrySource::Discovery,
                    rediscovered: true,
                    namespace,
                    root: String::new(),
                    cache_path: None,
                    options: DiscoveryOptions::default(),
                }
            }
        }
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, name: &str) -> Result<&ItemDescriptor, UnknownItemError> {
        self.items
            .get(name)
            .ok_or_else(|| UnknownItemError::new(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Run discovery again, replace the mapping, and persist it. On failure
    /// the previous mapping is kept.
    pub fn rebuild(&mut self) -> Result<(), RegistryError> {
        self.rediscovered = true;
        let items = discover(self.namespace.as_ref(), &self.root, &self.options)?;
        info!(count = items.len(), "discovered items");
        self.items = items;
        self.source = RegistrySource::Discovery;
        self.persist();
        Ok(())
    }

    pub fn source(&self) -> RegistrySource {
        self.source
    }

    /// True while the mapping came from a snapshot and no rebuild has been
    /// tried since, so a missing name may just mean the snapshot is stale.
    pub fn may_be_stale(&self) -> bool {
        self.source == RegistrySource::Snapshot && !self.rediscovered
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDescriptor> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    fn load_snapshot(&self) -> Option<BTreeMap<String, ItemDescriptor>> {
        let path = self.cache_path.as_deref()?;
        let loaded = Snapshot::load(path)
            .and_then(|s| s.resolve(self.namespace.as_ref(), &self.root, &self.options));
        match loaded {
            Ok(items) => {
                debug!(path = %path.display(), count = items.len(), "loaded registry snapshot");
                Some(items)
            }
            Err(e) => {
                info!(error = %e, "registry snapshot unusable, rediscovering");
                None
            }
        }
    }

    fn persist(&self) {
        let Some(path) = self.cache_path.as_deref() else {
            return;
        };
        match Snapshot::capture(&self.root, &self.options, &self.items).save(path) {
            Ok(()) => debug!(path = %path.display(), "saved registry snapshot"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to save registry snapshot"),
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("items", &self.items)
            .field("source", &self.source)
            .field("root", &self.root)
            .field("cache_path", &self.cache_path)
            .finish_non_exhaustive()
    }
}
