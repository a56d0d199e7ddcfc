//! Item descriptors
//!
//! A descriptor is everything the registry knows about one item type: its
//! metadata, the module that declared it, and a constructor. Descriptors are
//! immutable once created.

use crate::{Item, ItemMeta, ItemPlugin, ITEM_MARKER};
use glyph_core::{ConfigError, ItemOptions};

/// Builds a boxed item from its options
pub type Constructor = fn(&ItemOptions) -> Result<Box<dyn Item>, ConfigError>;

#[derive(Clone)]
pub struct ItemDescriptor {
    meta: ItemMeta,
    module: String,
    constructor: Constructor,
}

impl std::fmt::Debug for ItemDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemDescriptor")
            .field("name", &self.meta.name)
            .field("module", &self.module)
            .field("extends", &self.meta.extends)
            .finish_non_exhaustive()
    }
}

fn construct_boxed<T: ItemPlugin>(options: &ItemOptions) -> Result<Box<dyn Item>, ConfigError> {
    Ok(Box::new(T::from_options(options)?))
}

/// Module path of a type, taken from its fully-qualified type name
pub(crate) fn module_of<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    match full.rsplit_once("::") {
        Some((module, _)) => module,
        None => "",
    }
}

impl ItemDescriptor {
    pub fn new(meta: ItemMeta, module: impl Into<String>, constructor: Constructor) -> Self {
        Self {
            meta,
            module: module.into(),
            constructor,
        }
    }

    /// Descriptor for a plugin type declared in `module`
    pub fn of<T: ItemPlugin>(module: impl Into<String>) -> Self {
        Self::new(T::meta(), module, construct_boxed::<T>)
    }

    pub fn name(&self) -> &'static str {
        self.meta.name
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn extends(&self) -> &'static str {
        self.meta.extends
    }

    /// True when the type implements the Item capability directly
    pub fn is_direct(&self) -> bool {
        self.meta.extends == ITEM_MARKER
    }

    pub fn meta(&self) -> &ItemMeta {
        &self.meta
    }

    /// Check `options` against the declared option table.
    pub fn validate(&self, options: &ItemOptions) -> Result<(), ConfigError> {
        for key in options.keys() {
            if !self.meta.options.iter().any(|o| o.name == key) {
                return Err(ConfigError::unknown(key));
            }
        }
        for opt in self.meta.options {
            match options.get(opt.name) {
                None if opt.required => return Err(ConfigError::missing(opt.name)),
                None => {}
                Some(value) if !opt.kind.accepts(value) => {
                    return Err(ConfigError::wrong_type(opt.name, opt.kind.name(), value.type_name()));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Validate `options` and build a live item.
    pub fn construct(&self, options: &ItemOptions) -> Result<Box<dyn Item>, ConfigError> {
        self.validate(options)?;
        (self.constructor)(options)
    }
}
