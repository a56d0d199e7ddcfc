//! Glyph Plugin System
//!
//! Provides:
//! - `Item` / `ItemPlugin`: the item capability and its construction side
//! - `Manifest`: the explicit list of item types plugin crates load into
//! - `discover`: walks a `Namespace` and collects item descriptors
//! - `Registry`: name → descriptor map, cached as a `Snapshot` on disk

mod traits;
mod descriptor;
mod discovery;
mod manifest;
mod registry;
mod snapshot;
mod error;
mod error_item;

pub use traits::{Item, ItemPlugin, ItemMeta, OptionMeta, ITEM_MARKER};
pub use descriptor::{ItemDescriptor, Constructor};
pub use discovery::{
    discover, DiscoveryOptions, DuplicatePolicy, Inheritance, ModuleEntry, ModuleErrors, Namespace,
};
pub use manifest::Manifest;
pub use registry::{default_cache_path, Registry, RegistryBuilder, RegistrySource};
pub use snapshot::{Snapshot, SnapshotEntry, SNAPSHOT_FORMAT};
pub use error::{
    DiscoveryError, DuplicateItemError, ItemError, RegistryError, SnapshotLoadError,
    UnknownItemError,
};
pub use error_item::ErrorItem;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        Item, ItemDescriptor, ItemError, ItemMeta, ItemPlugin, Manifest, OptionMeta, ITEM_MARKER,
    };
    pub use glyph_core::prelude::*;
}
